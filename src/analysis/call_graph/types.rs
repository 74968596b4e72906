use crate::analysis::reactive_types::ReactiveKind;
use crate::model::{Expr, FunctionDecl, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a UI-building function: its name plus the ordered list of
/// parameter types, so overloads stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId {
    pub name: String,
    pub signature: Vec<String>,
}

impl FunctionId {
    pub fn new(name: impl Into<String>, signature: Vec<String>) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }

    pub fn of(decl: &FunctionDecl) -> Self {
        Self::new(decl.name.clone(), decl.signature())
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.signature.join(", "))
    }
}

/// Dense index of a node inside one [`UiCallGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteId {
    pub caller: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_name: Option<String>,
    pub kind: ReactiveKind,
    pub location: SourceLocation,
}

/// A UI-building function declaration. Immutable once the graph is built.
#[derive(Debug, Clone)]
pub struct FunctionNode<'ast> {
    pub id: FunctionId,
    pub params: Vec<Parameter>,
    pub decl: &'ast FunctionDecl,
    pub location: SourceLocation,
}

impl<'ast> FunctionNode<'ast> {
    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn reactive_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| p.kind.is_reactive())
    }
}

/// Where a call edge leads. Unresolved targets are explicit dead ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallTarget {
    Resolved(FunctionId),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct ArgumentBinding<'ast> {
    pub param: String,
    pub value: &'ast Expr,
}

/// One call from a UI-building function to another (or to an unresolved
/// target) in the caller's render scope.
#[derive(Debug, Clone)]
pub struct CallSite<'ast> {
    pub id: CallSiteId,
    pub callee_name: String,
    pub target: CallTarget,
    pub bindings: Vec<ArgumentBinding<'ast>>,
    pub expr: &'ast Expr,
    pub location: SourceLocation,
}

impl<'ast> CallSite<'ast> {
    /// Argument expression bound to the callee parameter `param`.
    pub fn argument_for(&self, param: &str) -> Option<&'ast Expr> {
        self.bindings
            .iter()
            .find(|b| b.param == param)
            .map(|b| b.value)
    }

    /// Callee parameter bound to this exact argument expression.
    pub fn param_for_argument(&self, value: &Expr) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| std::ptr::eq(b.value, value))
            .map(|b| b.param.as_str())
    }
}

/// Call graph restricted to UI-building functions.
#[derive(Debug, Clone, Default)]
pub struct UiCallGraph<'ast> {
    pub(super) nodes: Vec<FunctionNode<'ast>>,
    pub(super) index: im::HashMap<FunctionId, NodeId>,
    pub(super) call_sites: Vec<Vec<CallSite<'ast>>>,
    pub(super) incoming: Vec<Vec<CallSiteId>>,
    /// Call expression address to its call site.
    pub(super) sites_by_expr: im::HashMap<usize, CallSiteId>,
}

/// Identity of a call expression inside the borrowed syntax tree.
pub(super) fn expr_key(expr: &Expr) -> usize {
    expr as *const Expr as usize
}
