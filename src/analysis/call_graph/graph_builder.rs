//! Builds the UI call graph from compilation units.
//!
//! Two passes: the first registers every UI-building declaration so that
//! forward references resolve, the second walks each body and records call
//! sites in source order. Calls inside non-UI lambdas (event callbacks) are
//! skipped; local functions are walked as part of the enclosing body.

use super::types::{
    expr_key, ArgumentBinding, CallSite, CallSiteId, CallTarget, FunctionId, FunctionNode,
    NodeId, Parameter, UiCallGraph,
};
use crate::analysis::context::AnalysisContext;
use crate::analysis::reactive_types::ReactiveTypeClassifier;
use crate::core::{AnalysisError, Error, Result};
use crate::model::visit::{walk_expr, Visit};
use crate::model::{Argument, CallTargetRef, CompilationUnit, Expr, FunctionDecl, SourceLocation};
use std::path::Path;
use tracing::{debug, debug_span, warn};

pub struct CallGraphBuilder<'c> {
    classifier: &'c ReactiveTypeClassifier,
    ui_marker: &'c str,
}

impl<'c> CallGraphBuilder<'c> {
    pub fn new(classifier: &'c ReactiveTypeClassifier, ui_marker: &'c str) -> Self {
        Self {
            classifier,
            ui_marker,
        }
    }

    pub fn build<'ast>(
        &self,
        units: &'ast [CompilationUnit],
        ctx: &mut AnalysisContext,
    ) -> UiCallGraph<'ast> {
        let _span = debug_span!("build_call_graph", units = units.len()).entered();
        let mut graph = UiCallGraph::default();

        for unit in units {
            for decl in &unit.functions {
                if decl.has_annotation(self.ui_marker) {
                    self.add_node(&mut graph, &unit.path, decl, ctx);
                }
            }
        }

        for i in 0..graph.nodes.len() {
            let node = NodeId(i);
            let mut collector = CallSiteCollector::new(&graph, node);
            collector.visit_function(graph.nodes[i].decl);
            let (sites, errors) = collector.finish();
            for error in errors {
                ctx.record_error(error);
            }
            graph.call_sites.push(sites);
        }

        graph.incoming = vec![Vec::new(); graph.nodes.len()];
        for sites in &graph.call_sites {
            for site in sites {
                graph.sites_by_expr.insert(expr_key(site.expr), site.id);
                if let CallTarget::Resolved(callee) = &site.target {
                    if let Some(callee) = graph.index.get(callee) {
                        graph.incoming[callee.0].push(site.id);
                    }
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            call_sites = graph.call_site_count(),
            "UI call graph built"
        );
        graph
    }

    fn add_node<'ast>(
        &self,
        graph: &mut UiCallGraph<'ast>,
        unit_path: &Path,
        decl: &'ast FunctionDecl,
        ctx: &mut AnalysisContext,
    ) {
        let id = FunctionId::of(decl);
        let location = located(&decl.location, unit_path);

        if graph.index.contains_key(&id) {
            warn!(function = %id, "Duplicate UI-building declaration ignored");
            ctx.record_error(
                AnalysisError::in_function(
                    &id,
                    &Error::Analysis("duplicate declaration ignored".to_string()),
                )
                .at(location),
            );
            return;
        }

        let params = decl
            .params
            .iter()
            .map(|p| Parameter {
                name: p.name.clone(),
                type_name: p.ty.as_ref().map(|t| t.name.clone()),
                kind: self.classifier.classify(p.ty.as_ref()),
                location: located(&p.location, unit_path),
            })
            .collect();

        let node_id = NodeId(graph.nodes.len());
        graph.nodes.push(FunctionNode {
            id: id.clone(),
            params,
            decl,
            location,
        });
        graph.index.insert(id, node_id);
    }
}

/// Fill in the unit's path when the host left the file empty.
fn located(location: &SourceLocation, unit_path: &Path) -> SourceLocation {
    let mut location = location.clone();
    if location.file.as_os_str().is_empty() {
        location.file = unit_path.to_path_buf();
    }
    location
}

struct CallSiteCollector<'g, 'ast> {
    graph: &'g UiCallGraph<'ast>,
    caller: NodeId,
    sites: Vec<CallSite<'ast>>,
    errors: Vec<AnalysisError>,
}

impl<'g, 'ast> CallSiteCollector<'g, 'ast> {
    fn new(graph: &'g UiCallGraph<'ast>, caller: NodeId) -> Self {
        Self {
            graph,
            caller,
            sites: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (Vec<CallSite<'ast>>, Vec<AnalysisError>) {
        (self.sites, self.errors)
    }

    fn record(&mut self, expr: &'ast Expr) {
        let Expr::Call {
            callee,
            target,
            args,
            location,
            ..
        } = expr
        else {
            return;
        };

        let (target, bindings) = match target {
            CallTargetRef::Unknown => (CallTarget::Unknown, Vec::new()),
            CallTargetRef::Resolved { name, signature } => {
                let graph = self.graph;
                let id = FunctionId::new(name.clone(), signature.clone());
                // Resolved calls outside the graph are ordinary calls, not edges.
                let Some(callee_node) = graph.find_node(&id) else {
                    return;
                };
                match bind_arguments(callee_node, args) {
                    Ok(bindings) => (CallTarget::Resolved(id), bindings),
                    Err(e) => {
                        let caller = &graph.node(self.caller).id;
                        warn!(caller = %caller, error = %e, "Treating call as unresolved");
                        self.errors
                            .push(AnalysisError::in_function(caller, &e).at(location.clone()));
                        (CallTarget::Unknown, Vec::new())
                    }
                }
            }
        };

        self.sites.push(CallSite {
            id: CallSiteId {
                caller: self.caller,
                index: self.sites.len(),
            },
            callee_name: callee.clone(),
            target,
            bindings,
            expr,
            location: location.clone(),
        });
    }
}

impl<'g, 'ast> Visit<'ast> for CallSiteCollector<'g, 'ast> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Lambda {
                ui_building: false,
                ..
            } => {}
            Expr::Call { .. } => {
                self.record(expr);
                walk_expr(self, expr);
            }
            _ => walk_expr(self, expr),
        }
    }
}

/// Bind call arguments to the callee's parameters: named arguments by name,
/// a trailing lambda to the last parameter, the rest by position.
pub fn bind_arguments<'ast>(
    callee: &FunctionNode<'_>,
    args: &'ast [Argument],
) -> Result<Vec<ArgumentBinding<'ast>>> {
    let mut bindings: Vec<ArgumentBinding<'ast>> = Vec::with_capacity(args.len());
    let mut next_positional = 0;

    for arg in args {
        let param = if arg.trailing_lambda {
            callee.params.last()
        } else if let Some(name) = &arg.name {
            callee.param(name)
        } else {
            let param = callee.params.get(next_positional);
            next_positional += 1;
            param
        };

        let param = param.ok_or_else(|| match &arg.name {
            Some(name) => Error::binding(callee.name(), format!("no parameter named '{}'", name)),
            None => Error::binding(
                callee.name(),
                format!("too many arguments (expected {})", callee.params.len()),
            ),
        })?;

        if bindings.iter().any(|b| b.param == param.name) {
            return Err(Error::binding(
                callee.name(),
                format!("parameter '{}' bound twice", param.name),
            ));
        }

        bindings.push(ArgumentBinding {
            param: param.name.clone(),
            value: &arg.value,
        });
    }

    Ok(bindings)
}
