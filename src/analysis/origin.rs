//! Provenance of a chain's reactive value.
//!
//! Walks backward from the call site feeding the chain head: an inline
//! creation, or a local whose initializer is a creation or a stream
//! collection, ends the walk. A parameter (or a local aliasing one) moves the
//! walk one caller further up. Origin is best effort; `None` is a normal
//! outcome.

use crate::analysis::call_graph::{CallSiteId, FunctionId, NodeId, UiCallGraph};
use crate::analysis::chain_tracker::{Chain, ChainEntry};
use crate::analysis::reactive_types::{CreationKind, ReactiveTypeClassifier};
use crate::model::visit::{walk_expr, walk_function, Visit};
use crate::model::{Expr, FunctionDecl, SourceLocation, Stmt};
use im::HashSet;
use serde::Serialize;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginInfo {
    /// Local variable holding the created value; `None` for inline creation.
    pub variable: Option<String>,
    pub function: FunctionId,
    pub kind: CreationKind,
    pub location: SourceLocation,
}

pub struct OriginResolver<'a, 'g, 'ast> {
    graph: &'g UiCallGraph<'ast>,
    classifier: &'a ReactiveTypeClassifier,
}

impl<'a, 'g, 'ast> OriginResolver<'a, 'g, 'ast> {
    pub fn new(graph: &'g UiCallGraph<'ast>, classifier: &'a ReactiveTypeClassifier) -> Self {
        Self { graph, classifier }
    }

    pub fn resolve(&self, chain: &Chain) -> Option<OriginInfo> {
        let ChainEntry::CallSite(site) = chain.entry else {
            return None;
        };
        let head = chain.links.first()?;
        self.resolve_from(site, &head.parameter)
    }

    /// Resolve the origin of the argument bound to `param` at `site`.
    pub fn resolve_from(&self, site: CallSiteId, param: &str) -> Option<OriginInfo> {
        let mut visited: HashSet<(NodeId, String)> = HashSet::new();
        let mut site_id = site;
        let mut param = param.to_string();

        loop {
            let site = self.graph.call_site(site_id);
            let caller = self.graph.node(site_id.caller);
            let arg = site.argument_for(&param)?;

            if let Some(kind) = self.classifier.creation_kind(arg) {
                return Some(OriginInfo {
                    variable: None,
                    function: caller.id.clone(),
                    kind,
                    location: site.location.clone(),
                });
            }

            let name = arg.as_ident()?;
            let outer_param = match binding_at(caller.decl, site.expr, name) {
                Some(Binding::Local(local)) => {
                    if local.delegated {
                        return None;
                    }
                    let init = local.initializer?;
                    if let Some(kind) = self.classifier.creation_kind(init) {
                        return Some(OriginInfo {
                            variable: Some(name.to_string()),
                            function: caller.id.clone(),
                            kind,
                            location: local.location.clone(),
                        });
                    }
                    caller.param(init.as_ident()?)?.name.clone()
                }
                // Parameter of an enclosing lambda or local function.
                Some(Binding::Inner) => return None,
                None => caller.param(name)?.name.clone(),
            };

            if visited
                .insert((site_id.caller, outer_param.clone()))
                .is_some()
            {
                return None;
            }

            trace!(function = %caller.id, param = %outer_param, "Origin walks to caller");
            site_id = *self
                .graph
                .incoming(site_id.caller)
                .iter()
                .find(|s| self.graph.call_site(**s).argument_for(&outer_param).is_some())?;
            param = outer_param;
        }
    }
}

#[derive(Clone, Copy)]
struct LocalDecl<'ast> {
    delegated: bool,
    initializer: Option<&'ast Expr>,
    location: &'ast SourceLocation,
}

#[derive(Clone, Copy)]
enum Binding<'ast> {
    Local(LocalDecl<'ast>),
    Inner,
}

/// The declaration `name` refers to at the call expression `call`: the
/// innermost local declared before it in an enclosing block, or a parameter
/// of an enclosing lambda or local function. `None` means the function's own
/// parameter (or nothing) is visible.
fn binding_at<'ast>(
    function: &'ast FunctionDecl,
    call: &Expr,
    name: &str,
) -> Option<Binding<'ast>> {
    let mut finder = ScopeFinder {
        name,
        call,
        scope: Vec::new(),
        found: None,
    };
    finder.visit_block(&function.body);
    finder.found.flatten()
}

struct ScopeFinder<'n, 'ast> {
    name: &'n str,
    call: &'n Expr,
    /// Bindings of `name` currently in scope, innermost last.
    scope: Vec<Binding<'ast>>,
    /// Set once the call is reached.
    found: Option<Option<Binding<'ast>>>,
}

impl<'n, 'ast> ScopeFinder<'n, 'ast> {
    fn scoped(&mut self, shadows: bool, visit: impl FnOnce(&mut Self)) {
        let depth = self.scope.len();
        if shadows {
            self.scope.push(Binding::Inner);
        }
        visit(self);
        self.scope.truncate(depth);
    }
}

impl<'n, 'ast> Visit<'ast> for ScopeFinder<'n, 'ast> {
    fn visit_function(&mut self, function: &'ast FunctionDecl) {
        let shadows = function.params.iter().any(|p| p.name == self.name);
        self.scoped(shadows, |finder| walk_function(finder, function));
    }

    fn visit_block(&mut self, stmts: &'ast [Stmt]) {
        self.scoped(false, |finder| {
            for stmt in stmts {
                if finder.found.is_some() {
                    return;
                }
                finder.visit_stmt(stmt);
                if let Stmt::Local {
                    name,
                    delegated,
                    initializer,
                    location,
                } = stmt
                {
                    if name == finder.name {
                        finder.scope.push(Binding::Local(LocalDecl {
                            delegated: *delegated,
                            initializer: initializer.as_ref(),
                            location,
                        }));
                    }
                }
            }
        });
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if self.found.is_some() {
            return;
        }
        if std::ptr::eq(expr, self.call) {
            self.found = Some(self.scope.last().copied());
            return;
        }
        match expr {
            Expr::Lambda { params, body, .. } => {
                let shadows = params.iter().any(|p| p == self.name);
                self.scoped(shadows, |finder| finder.visit_block(body));
            }
            _ => walk_expr(self, expr),
        }
    }
}
