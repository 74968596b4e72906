//! Findings and the reporter that turns qualifying chains into them.

pub mod suppression;

use crate::analysis::call_graph::{FunctionId, UiCallGraph};
use crate::analysis::chain_tracker::{Chain, ChainLink};
use crate::analysis::origin::OriginInfo;
use crate::analysis::reactive_types::{CreationKind, ReactiveKind};
use crate::config::DetectionConfig;
use crate::core::{AnalysisError, Severity};
use crate::model::SourceLocation;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FindingKind {
    ReactivePassThrough,
}

impl FindingKind {
    pub fn id(self) -> &'static str {
        match self {
            FindingKind::ReactivePassThrough => "ReactivePassThrough",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One unnecessary relay layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// Declaration of the relayed parameter.
    pub location: SourceLocation,
    pub parameter: String,
    pub parameter_kind: ReactiveKind,
    pub function: String,
    pub function_id: FunctionId,
    pub forwarded_to: String,
    pub chain: Vec<String>,
    pub origin: Option<OriginInfo>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub units: usize,
    pub ui_functions: usize,
    pub call_sites: usize,
    pub unresolved_call_sites: usize,
    pub chains: usize,
    pub reported_chains: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub findings: Vec<Finding>,
    /// Findings dropped by `@Suppress`.
    pub suppressed: usize,
    pub errors: Vec<AnalysisError>,
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Fold another batch's report into this one.
    pub fn merge(&mut self, other: AnalysisReport) {
        self.findings.extend(other.findings);
        self.suppressed += other.suppressed;
        self.errors.extend(other.errors);
        self.stats.units += other.stats.units;
        self.stats.ui_functions += other.stats.ui_functions;
        self.stats.call_sites += other.stats.call_sites;
        self.stats.unresolved_call_sites += other.stats.unresolved_call_sites;
        self.stats.chains += other.stats.chains;
        self.stats.reported_chains += other.stats.reported_chains;
    }
}

pub struct Reporter<'g, 'ast> {
    graph: &'g UiCallGraph<'ast>,
    config: &'g DetectionConfig,
    reported: HashSet<ChainLink>,
    findings: Vec<Finding>,
    suppressed: usize,
    reported_chains: usize,
}

impl<'g, 'ast> Reporter<'g, 'ast> {
    pub fn new(graph: &'g UiCallGraph<'ast>, config: &'g DetectionConfig) -> Self {
        Self {
            graph,
            config,
            reported: HashSet::new(),
            findings: Vec::new(),
            suppressed: 0,
            reported_chains: 0,
        }
    }

    /// Emit one finding per relay link of `chain` not already reported.
    /// Returns the number of findings emitted.
    pub fn report(&mut self, chain: &Chain) -> usize {
        let path = chain.path(self.graph);
        let mut emitted = 0;

        for (i, link) in chain.links.iter().enumerate() {
            if !self.reported.insert(link.clone()) {
                continue;
            }

            let node = self.graph.node(link.function);
            let Some(param) = node.param(&link.parameter) else {
                continue;
            };

            if suppression::is_suppressed(node.decl, &self.config.suppression_ids) {
                debug!(function = %node.id, param = %param.name, "Finding suppressed");
                self.suppressed += 1;
                continue;
            }

            let forwarded_to = path[i + 1].clone();
            let message = relay_message(
                &param.name,
                node.name(),
                &forwarded_to,
                &path,
                chain.origin.as_ref(),
            );

            self.findings.push(Finding {
                kind: FindingKind::ReactivePassThrough,
                severity: self.config.severity,
                location: param.location.clone(),
                parameter: param.name.clone(),
                parameter_kind: param.kind,
                function: node.name().to_string(),
                function_id: node.id.clone(),
                forwarded_to,
                chain: path.clone(),
                origin: chain.origin.clone(),
                message,
            });
            emitted += 1;
        }

        if emitted > 0 {
            self.reported_chains += 1;
        }
        emitted
    }

    pub fn reported_chains(&self) -> usize {
        self.reported_chains
    }

    /// Findings in discovery order and the suppressed count.
    pub fn finish(self) -> (Vec<Finding>, usize) {
        (self.findings, self.suppressed)
    }
}

fn relay_message(
    parameter: &str,
    function: &str,
    forwarded_to: &str,
    path: &[String],
    origin: Option<&OriginInfo>,
) -> String {
    let message = format!(
        "Reactive parameter '{}' of '{}' is passed through unchanged to '{}' without being read (chain: {})",
        parameter,
        function,
        forwarded_to,
        path.join(" -> ")
    );

    match origin {
        Some(origin) => format!("{}; {}", message, describe_origin(origin)),
        None => message,
    }
}

fn describe_origin(origin: &OriginInfo) -> String {
    let function = &origin.function.name;
    match (&origin.variable, origin.kind) {
        (Some(variable), CreationKind::DirectCreation) => {
            format!("originates from '{}' in '{}'", variable, function)
        }
        (Some(variable), CreationKind::CollectedFromStream) => format!(
            "originates from '{}' collected from a stream in '{}'",
            variable, function
        ),
        (None, CreationKind::DirectCreation) => {
            format!("originates from a value created inline in '{}'", function)
        }
        (None, CreationKind::CollectedFromStream) => {
            format!("originates from a stream collected inline in '{}'", function)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(variable: Option<&str>, kind: CreationKind) -> OriginInfo {
        OriginInfo {
            variable: variable.map(str::to_string),
            function: FunctionId::new("A", vec![]),
            kind,
            location: SourceLocation::new("A.kt", 3, 9),
        }
    }

    #[test]
    fn test_message_without_origin() {
        let path = vec!["B".to_string(), "C".to_string(), "D".to_string()];
        assert_eq!(
            relay_message("v", "B", "C", &path, None),
            "Reactive parameter 'v' of 'B' is passed through unchanged to 'C' without being read (chain: B -> C -> D)"
        );
    }

    #[test]
    fn test_message_with_origin() {
        let path = vec!["B".to_string(), "C".to_string(), "D".to_string()];
        let message = relay_message(
            "v",
            "C",
            "D",
            &path,
            Some(&origin(Some("v"), CreationKind::DirectCreation)),
        );
        assert!(message.ends_with("; originates from 'v' in 'A'"));

        let collected = describe_origin(&origin(Some("s"), CreationKind::CollectedFromStream));
        assert_eq!(
            collected,
            "originates from 's' collected from a stream in 'A'"
        );
        let inline = describe_origin(&origin(None, CreationKind::DirectCreation));
        assert_eq!(inline, "originates from a value created inline in 'A'");
    }

    #[test]
    fn test_merge_accumulates() {
        let mut a = AnalysisReport::default();
        a.stats.units = 1;
        a.suppressed = 1;
        let mut b = AnalysisReport::default();
        b.stats.units = 2;
        b.stats.chains = 3;
        a.merge(b);
        assert_eq!(a.stats.units, 3);
        assert_eq!(a.stats.chains, 3);
        assert_eq!(a.suppressed, 1);
    }
}
