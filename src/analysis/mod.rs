//! Reactive pass-through analysis.
//!
//! The pipeline runs in four stages over a single run-scoped
//! [`AnalysisContext`]: build the UI call graph, classify parameter usage on
//! demand, reconstruct chains, then resolve origins and report the chains
//! that qualify.

pub mod call_graph;
pub mod chain_tracker;
pub mod consumption;
pub mod context;
pub mod origin;
pub mod reactive_types;

pub use call_graph::{CallGraphBuilder, FunctionId, UiCallGraph};
pub use chain_tracker::{Chain, ChainEntry, ChainLink, ChainTerminal, ChainTracker};
pub use consumption::{ConsumptionAnalyzer, ParameterUsage, UsageClassification};
pub use context::AnalysisContext;
pub use origin::{OriginInfo, OriginResolver};
pub use reactive_types::{CreationKind, ReactiveKind, ReactiveTypeClassifier};

use crate::config::RelaymapConfig;
use crate::model::CompilationUnit;
use crate::report::{AnalysisReport, AnalysisStats, Reporter};
use tracing::{debug, debug_span, info};

pub struct PassThroughAnalyzer {
    config: RelaymapConfig,
    classifier: ReactiveTypeClassifier,
}

impl PassThroughAnalyzer {
    pub fn new(config: RelaymapConfig) -> Self {
        let classifier = ReactiveTypeClassifier::new(&config.reactive_types);
        Self { config, classifier }
    }

    pub fn config(&self) -> &RelaymapConfig {
        &self.config
    }

    pub fn analyze(&self, units: &[CompilationUnit]) -> AnalysisReport {
        let _span = debug_span!("analyze_pass_through", units = units.len()).entered();
        let detection = &self.config.detection;
        let mut ctx = AnalysisContext::new();

        let graph = CallGraphBuilder::new(&self.classifier, &detection.ui_marker)
            .build(units, &mut ctx);
        let analyzer = ConsumptionAnalyzer::new(&graph);
        let mut chains = ChainTracker::new(&analyzer).track(&mut ctx);

        let resolver = OriginResolver::new(&graph, &self.classifier);
        let mut reporter = Reporter::new(&graph, detection);
        for chain in chains.iter_mut() {
            if !chain.qualifies(detection.min_relay_links) {
                debug!(
                    relays = chain.relay_count(),
                    consumed = chain.is_consumed(),
                    "Chain below reporting threshold"
                );
                continue;
            }
            chain.origin = resolver.resolve(chain);
            reporter.report(chain);
        }

        let stats = AnalysisStats {
            units: units.len(),
            ui_functions: graph.node_count(),
            call_sites: graph.call_site_count(),
            unresolved_call_sites: graph.unresolved_call_site_count(),
            chains: chains.len(),
            reported_chains: reporter.reported_chains(),
        };
        let (findings, suppressed) = reporter.finish();

        info!(
            findings = findings.len(),
            suppressed,
            chains = stats.chains,
            "Pass-through analysis complete"
        );

        AnalysisReport {
            findings,
            suppressed,
            errors: ctx.into_errors(),
            stats,
        }
    }
}

impl Default for PassThroughAnalyzer {
    fn default() -> Self {
        Self::new(RelaymapConfig::default())
    }
}

/// Analyze `units` with `config` in a fresh run.
pub fn analyze_units(units: &[CompilationUnit], config: &RelaymapConfig) -> AnalysisReport {
    PassThroughAnalyzer::new(config.clone()).analyze(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Annotation, Argument, Expr, FunctionDecl, ParamDecl, Stmt};

    fn composable(name: &str, params: Vec<ParamDecl>, body: Vec<Stmt>) -> FunctionDecl {
        FunctionDecl::new(name, params, body).with_annotation(Annotation::new("Composable"))
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        let report = PassThroughAnalyzer::default().analyze(&[]);
        assert!(!report.has_findings());
        assert_eq!(report.stats, AnalysisStats::default());
    }

    #[test]
    fn test_stats_count_graph() {
        let leaf = composable(
            "Leaf",
            vec![ParamDecl::new("v", "State<Int>")],
            vec![Stmt::expr(Expr::member(Expr::ident("v"), "value"))],
        );
        let root = composable(
            "Root",
            vec![ParamDecl::new("v", "State<Int>")],
            vec![
                Stmt::expr(Expr::call_to(&leaf, vec![Argument::positional(Expr::ident("v"))])),
                Stmt::expr(Expr::unresolved_call("Mystery", vec![])),
            ],
        );
        let plain = FunctionDecl::new("helper", vec![], vec![]);
        let units = vec![CompilationUnit::new("Stats.kt", vec![leaf, root, plain])];

        let report = analyze_units(&units, &RelaymapConfig::default());
        assert_eq!(report.stats.units, 1);
        assert_eq!(report.stats.ui_functions, 2);
        assert_eq!(report.stats.call_sites, 2);
        assert_eq!(report.stats.unresolved_call_sites, 1);
        // Root relays once into a reader: a chain, but below the threshold.
        assert_eq!(report.stats.chains, 1);
        assert_eq!(report.stats.reported_chains, 0);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let leaf = composable(
            "Leaf",
            vec![ParamDecl::new("v", "State<Int>")],
            vec![Stmt::expr(Expr::member(Expr::ident("v"), "value"))],
        );
        let root = composable(
            "Root",
            vec![ParamDecl::new("v", "State<Int>")],
            vec![Stmt::expr(Expr::call_to(
                &leaf,
                vec![Argument::positional(Expr::ident("v"))],
            ))],
        );
        let units = vec![CompilationUnit::new("Threshold.kt", vec![leaf, root])];

        let mut config = RelaymapConfig::default();
        config.detection.min_relay_links = 1;
        let report = analyze_units(&units, &config);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].function, "Root");
        assert_eq!(report.findings[0].forwarded_to, "Leaf");
    }
}
