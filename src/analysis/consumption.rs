//! Per-function parameter usage classification.
//!
//! Every reference to a parameter inside the function's scope is one of:
//! - a *forward*: the untouched reference passed as an argument of a call
//!   site resolved to another UI-building function whose parameter accepts
//!   the same container kind;
//! - a *dead end*: passed to an unresolved call, or to a UI-building callee
//!   whose parameter is not a compatible container;
//! - a *consumption*: anything else, including every reference inside an
//!   event callback.
//!
//! Any consumption makes the parameter `Consumed`; otherwise the first
//! forward makes it `PureForward`; otherwise it is `Unused`.

use crate::analysis::call_graph::{CallSite, CallSiteId, CallTarget, FunctionId, NodeId, UiCallGraph};
use crate::analysis::context::AnalysisContext;
use crate::analysis::reactive_types::ReactiveKind;
use crate::core::{AnalysisError, Error, Result};
use crate::model::visit::{walk_expr, walk_function, Visit};
use crate::model::{Expr, FunctionDecl, Stmt};
use std::collections::HashSet;
use tracing::{trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageClassification {
    Consumed,
    Unused,
    PureForward {
        call_site: CallSiteId,
        callee_param: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forward {
    pub call_site: CallSiteId,
    pub callee_param: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterUsage {
    pub classification: UsageClassification,
    /// All forwarding occurrences in source order.
    pub forwards: Vec<Forward>,
    /// Number of distinct callees the parameter is forwarded to.
    pub fan_out: usize,
    pub dead_ends: usize,
}

impl ParameterUsage {
    pub fn unused() -> Self {
        Self {
            classification: UsageClassification::Unused,
            forwards: Vec::new(),
            fan_out: 0,
            dead_ends: 0,
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.classification == UsageClassification::Consumed
    }

    pub fn is_pure_forward(&self) -> bool {
        matches!(self.classification, UsageClassification::PureForward { .. })
    }

    /// Forwarded untouched to two or more distinct callees.
    pub fn is_distribution(&self) -> bool {
        self.is_pure_forward() && self.fan_out > 1
    }

    /// The representative forward edge used for chain tracking.
    pub fn forward_target(&self) -> Option<(CallSiteId, &str)> {
        match &self.classification {
            UsageClassification::PureForward {
                call_site,
                callee_param,
            } => Some((*call_site, callee_param.as_str())),
            _ => None,
        }
    }
}

pub struct ConsumptionAnalyzer<'g, 'ast> {
    graph: &'g UiCallGraph<'ast>,
}

impl<'g, 'ast> ConsumptionAnalyzer<'g, 'ast> {
    pub fn new(graph: &'g UiCallGraph<'ast>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g UiCallGraph<'ast> {
        self.graph
    }

    /// Classify one parameter of one function, without caching.
    pub fn classify(&self, node: NodeId, param: &str) -> Result<ParameterUsage> {
        let function = self.graph.node(node);
        let parameter = function.param(param).ok_or_else(|| {
            Error::Analysis(format!(
                "'{}' has no parameter '{}'",
                function.name(),
                param
            ))
        })?;

        let mut scanner = UsageScanner::new(self.graph, node, &parameter.name, parameter.kind);
        // The body is scanned as a block: the parameter list itself must not
        // count as shadowing.
        scanner.visit_block(&function.decl.body);
        scanner.finish()
    }

    /// Memoised classification; failures are recorded and read as `Unused`.
    pub fn usage(&self, ctx: &mut AnalysisContext, node: NodeId, param: &str) -> ParameterUsage {
        if let Some(usage) = ctx.cached_usage(node, param) {
            return usage.clone();
        }

        let usage = match self.classify(node, param) {
            Ok(usage) => usage,
            Err(e) => {
                let function = &self.graph.node(node).id;
                warn!(function = %function, param, error = %e, "Parameter analysis failed");
                ctx.record_error(AnalysisError::in_function(function, &e));
                ParameterUsage::unused()
            }
        };

        trace!(
            function = %self.graph.node(node).id,
            param,
            classification = ?usage.classification,
            "Classified parameter usage"
        );
        ctx.store_usage(node, param, usage.clone());
        usage
    }
}

struct UsageScanner<'g, 'ast> {
    graph: &'g UiCallGraph<'ast>,
    node: NodeId,
    param: &'g str,
    kind: ReactiveKind,
    shadowed: bool,
    callback_depth: usize,
    consumed: bool,
    forwards: Vec<Forward>,
    dead_ends: usize,
    error: Option<Error>,
}

impl<'g, 'ast> UsageScanner<'g, 'ast> {
    fn new(graph: &'g UiCallGraph<'ast>, node: NodeId, param: &'g str, kind: ReactiveKind) -> Self {
        Self {
            graph,
            node,
            param,
            kind,
            shadowed: false,
            callback_depth: 0,
            consumed: false,
            forwards: Vec::new(),
            dead_ends: 0,
            error: None,
        }
    }

    fn refers_to_param(&self, name: &str) -> bool {
        !self.shadowed && name == self.param
    }

    fn visit_call_site(&mut self, site: &'g CallSite<'ast>, expr: &'ast Expr) {
        let Expr::Call { receiver, args, .. } = expr else {
            return;
        };

        if let Some(receiver) = receiver {
            self.visit_expr(receiver);
        }

        for arg in args {
            match arg.value.as_ident() {
                Some(name) if self.refers_to_param(name) => self.record_argument(site, &arg.value),
                _ => self.visit_argument(arg),
            }
        }
    }

    fn record_argument(&mut self, site: &CallSite<'ast>, value: &Expr) {
        let callee = match &site.target {
            CallTarget::Resolved(callee) => callee,
            CallTarget::Unknown => {
                self.dead_ends += 1;
                return;
            }
        };

        let Some(callee_param) = site.param_for_argument(value) else {
            self.error = Some(Error::Analysis(format!(
                "argument '{}' of call to '{}' has no parameter binding",
                self.param, site.callee_name
            )));
            return;
        };

        let compatible = self
            .graph
            .find_node(callee)
            .and_then(|node| node.param(callee_param))
            .map(|p| self.kind.is_assignable_to(p.kind))
            .unwrap_or(false);

        if compatible {
            self.forwards.push(Forward {
                call_site: site.id,
                callee_param: callee_param.to_string(),
            });
        } else {
            self.dead_ends += 1;
        }
    }

    fn finish(self) -> Result<ParameterUsage> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let fan_out = self
            .forwards
            .iter()
            .filter_map(|f| match &self.graph.call_site(f.call_site).target {
                CallTarget::Resolved(id) => Some(id),
                CallTarget::Unknown => None,
            })
            .collect::<HashSet<&FunctionId>>()
            .len();

        let classification = if self.consumed {
            UsageClassification::Consumed
        } else if let Some(first) = self.forwards.first() {
            UsageClassification::PureForward {
                call_site: first.call_site,
                callee_param: first.callee_param.clone(),
            }
        } else {
            UsageClassification::Unused
        };

        Ok(ParameterUsage {
            classification,
            forwards: self.forwards,
            fan_out,
            dead_ends: self.dead_ends,
        })
    }
}

impl<'g, 'ast> Visit<'ast> for UsageScanner<'g, 'ast> {
    fn visit_function(&mut self, function: &'ast FunctionDecl) {
        // Local function whose own parameter hides ours.
        if function.params.iter().any(|p| p.name == self.param) {
            return;
        }
        walk_function(self, function);
    }

    fn visit_block(&mut self, stmts: &'ast [Stmt]) {
        let outer = self.shadowed;
        for stmt in stmts {
            self.visit_stmt(stmt);
            if let Stmt::Local { name, .. } = stmt {
                if name == self.param {
                    self.shadowed = true;
                }
            }
        }
        self.shadowed = outer;
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Ident { name, .. } => {
                if self.refers_to_param(name) {
                    self.consumed = true;
                }
            }
            Expr::Lambda {
                ui_building,
                params,
                body,
            } => {
                if params.iter().any(|p| p == self.param) {
                    return;
                }
                let callback = !*ui_building;
                if callback {
                    self.callback_depth += 1;
                }
                self.visit_block(body);
                if callback {
                    self.callback_depth -= 1;
                }
            }
            Expr::Call { .. } if self.callback_depth == 0 => {
                let graph = self.graph;
                match graph.call_site_for_expr(self.node, expr) {
                    Some(site) => self.visit_call_site(site, expr),
                    None => walk_expr(self, expr),
                }
            }
            _ => walk_expr(self, expr),
        }
    }
}
