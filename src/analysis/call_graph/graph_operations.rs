//! Queries over a built [`UiCallGraph`].

use super::types::{
    expr_key, CallSite, CallSiteId, CallTarget, FunctionId, FunctionNode, NodeId, UiCallGraph,
};
use crate::model::Expr;

impl<'ast> UiCallGraph<'ast> {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn call_site_count(&self) -> usize {
        self.call_sites.iter().map(Vec::len).sum()
    }

    pub fn unresolved_call_site_count(&self) -> usize {
        self.call_sites
            .iter()
            .flatten()
            .filter(|site| site.target == CallTarget::Unknown)
            .count()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &FunctionNode<'ast>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn node(&self, id: NodeId) -> &FunctionNode<'ast> {
        &self.nodes[id.0]
    }

    pub fn node_id(&self, function: &FunctionId) -> Option<NodeId> {
        self.index.get(function).copied()
    }

    pub fn find_node(&self, function: &FunctionId) -> Option<&FunctionNode<'ast>> {
        self.node_id(function).map(|id| self.node(id))
    }

    /// Outgoing call sites of `node` in source order.
    pub fn call_sites(&self, node: NodeId) -> &[CallSite<'ast>] {
        &self.call_sites[node.0]
    }

    pub fn call_site(&self, id: CallSiteId) -> &CallSite<'ast> {
        &self.call_sites[id.caller.0][id.index]
    }

    /// The call site recorded for this exact call expression, if any.
    pub fn call_site_for_expr(&self, node: NodeId, expr: &Expr) -> Option<&CallSite<'ast>> {
        self.sites_by_expr
            .get(&expr_key(expr))
            .filter(|id| id.caller == node)
            .map(|id| self.call_site(*id))
    }

    pub fn callee(&self, site: CallSiteId) -> Option<NodeId> {
        match &self.call_site(site).target {
            CallTarget::Resolved(id) => self.node_id(id),
            CallTarget::Unknown => None,
        }
    }

    /// Call sites targeting `node`, ordered by caller then by source order.
    pub fn incoming(&self, node: NodeId) -> &[CallSiteId] {
        &self.incoming[node.0]
    }

    pub fn callers(&self, node: NodeId) -> Vec<NodeId> {
        let mut callers: Vec<NodeId> = self.incoming(node).iter().map(|s| s.caller).collect();
        callers.dedup();
        callers
    }

    pub fn callees(&self, node: NodeId) -> Vec<NodeId> {
        let mut callees = Vec::new();
        for site in self.call_sites(node) {
            if let Some(callee) = self.callee(site.id) {
                if !callees.contains(&callee) {
                    callees.push(callee);
                }
            }
        }
        callees
    }
}
