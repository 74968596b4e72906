//! Call graph over UI-building functions.
//!
//! Nodes are keyed by [`FunctionId`] (name plus parameter-type signature), so
//! overloads never collapse into one node. Edges are [`CallSite`]s with the
//! argument expression bound to each callee parameter; calls the host could
//! not resolve are kept as [`CallTarget::Unknown`] dead ends.

mod graph_builder;
mod graph_operations;
mod types;

pub use graph_builder::{bind_arguments, CallGraphBuilder};
pub use types::{
    ArgumentBinding, CallSite, CallSiteId, CallTarget, FunctionId, FunctionNode, NodeId,
    Parameter, UiCallGraph,
};
