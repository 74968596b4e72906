//! Pass-through chain reconstruction.
//!
//! A chain starts at a parameter classified `PureForward` that is not itself
//! fed by a representative forward from every caller, and follows forward
//! edges until the value is consumed, dropped, handed to several siblings, or
//! a (function, parameter) pair repeats.
//!
//! A function forwarding one parameter to two or more distinct callees is a
//! distribution point, not a relay: it ends the chain reaching it and each of
//! its callees heads a chain of its own.

use crate::analysis::call_graph::{CallSiteId, NodeId, UiCallGraph};
use crate::analysis::consumption::ConsumptionAnalyzer;
use crate::analysis::context::AnalysisContext;
use crate::analysis::origin::OriginInfo;
use crate::model::Expr;
use im::HashSet;
use tracing::{debug, debug_span, trace};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainLink {
    pub function: NodeId,
    pub parameter: String,
}

impl ChainLink {
    pub fn new(function: NodeId, parameter: impl Into<String>) -> Self {
        Self {
            function,
            parameter: parameter.into(),
        }
    }
}

/// How a chain ended. Only chains whose value is needed at the terminal
/// (`Consumed` or `Distributed`) are ever reported. A distribution point
/// none of whose callees reads the value ends the chain as `Unused`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainTerminal {
    Consumed(ChainLink),
    /// Forwarded to several distinct callees, at least one of which reads it.
    Distributed(ChainLink),
    Unused(ChainLink),
    Cycle(ChainLink),
}

impl ChainTerminal {
    pub fn link(&self) -> &ChainLink {
        match self {
            ChainTerminal::Consumed(link)
            | ChainTerminal::Distributed(link)
            | ChainTerminal::Unused(link)
            | ChainTerminal::Cycle(link) => link,
        }
    }
}

/// Where the head of a chain receives its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEntry {
    /// No call site in the graph supplies the parameter.
    Root,
    CallSite(CallSiteId),
}

#[derive(Debug, Clone)]
pub struct Chain {
    /// Relay links, each classified `PureForward`.
    pub links: Vec<ChainLink>,
    pub terminal: ChainTerminal,
    pub entry: ChainEntry,
    pub origin: Option<OriginInfo>,
}

impl Chain {
    pub fn relay_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_consumed(&self) -> bool {
        matches!(
            self.terminal,
            ChainTerminal::Consumed(_) | ChainTerminal::Distributed(_)
        )
    }

    pub fn qualifies(&self, min_relay_links: usize) -> bool {
        self.is_consumed() && self.relay_count() >= min_relay_links
    }

    /// Function names from the first relay to the terminal function.
    pub fn path(&self, graph: &UiCallGraph<'_>) -> Vec<String> {
        self.links
            .iter()
            .chain(std::iter::once(self.terminal.link()))
            .map(|link| graph.node(link.function).name().to_string())
            .collect()
    }
}

pub struct ChainTracker<'a, 'g, 'ast> {
    analyzer: &'a ConsumptionAnalyzer<'g, 'ast>,
}

impl<'a, 'g, 'ast> ChainTracker<'a, 'g, 'ast> {
    pub fn new(analyzer: &'a ConsumptionAnalyzer<'g, 'ast>) -> Self {
        Self { analyzer }
    }

    /// Every chain in the graph, in node then parameter declaration order.
    pub fn track(&self, ctx: &mut AnalysisContext) -> Vec<Chain> {
        let _span = debug_span!("track_chains").entered();
        let graph = self.analyzer.graph();
        let mut chains = Vec::new();

        for (node_id, node) in graph.nodes() {
            for param in node.reactive_params() {
                let usage = self.analyzer.usage(ctx, node_id, &param.name);
                if !usage.is_pure_forward() || usage.is_distribution() {
                    continue;
                }
                let Some(entry) = self.chain_entry(ctx, node_id, &param.name) else {
                    trace!(function = %node.id, param = %param.name, "Not a chain head");
                    continue;
                };

                let (links, terminal) = self.follow(ctx, ChainLink::new(node_id, &param.name));
                debug!(
                    head = %node.id,
                    param = %param.name,
                    relays = links.len(),
                    terminal = ?terminal,
                    "Tracked chain"
                );
                chains.push(Chain {
                    links,
                    terminal,
                    entry,
                    origin: None,
                });
            }
        }

        chains
    }

    /// Follow `PureForward` edges from `start`. The visited set bounds the
    /// walk by the number of (function, parameter) pairs.
    pub fn follow(
        &self,
        ctx: &mut AnalysisContext,
        start: ChainLink,
    ) -> (Vec<ChainLink>, ChainTerminal) {
        let graph = self.analyzer.graph();
        let mut visited: HashSet<ChainLink> = HashSet::new();
        let mut links = Vec::new();
        let mut current = start;

        loop {
            if visited.insert(current.clone()).is_some() {
                return (links, ChainTerminal::Cycle(current));
            }

            let usage = self.analyzer.usage(ctx, current.function, &current.parameter);
            if usage.is_distribution() {
                let terminal = if self.reaches_reader(ctx, &current) {
                    ChainTerminal::Distributed(current)
                } else {
                    ChainTerminal::Unused(current)
                };
                return (links, terminal);
            }
            match usage.forward_target() {
                Some((site, callee_param)) => match graph.callee(site) {
                    Some(next) => {
                        let next = ChainLink::new(next, callee_param);
                        links.push(std::mem::replace(&mut current, next));
                    }
                    None => return (links, ChainTerminal::Unused(current)),
                },
                None if usage.is_consumed() => return (links, ChainTerminal::Consumed(current)),
                None => return (links, ChainTerminal::Unused(current)),
            }
        }
    }

    /// Whether some forward edge below `start` ends at a function that reads
    /// the value. Every edge of a distribution point is explored.
    fn reaches_reader(&self, ctx: &mut AnalysisContext, start: &ChainLink) -> bool {
        let graph = self.analyzer.graph();
        let mut visited: HashSet<ChainLink> = HashSet::new();
        let mut pending = vec![start.clone()];

        while let Some(link) = pending.pop() {
            if visited.insert(link.clone()).is_some() {
                continue;
            }
            let usage = self.analyzer.usage(ctx, link.function, &link.parameter);
            if usage.is_consumed() {
                return true;
            }
            for forward in &usage.forwards {
                if let Some(callee) = graph.callee(forward.call_site) {
                    pending.push(ChainLink::new(callee, forward.callee_param.clone()));
                }
            }
        }

        trace!(
            function = %graph.node(start.function).id,
            param = %start.parameter,
            "No reader below distribution point"
        );
        false
    }

    /// `Some` when (node, param) starts a chain: nothing supplies it, or at
    /// least one supplying call site is not the caller's own relay edge.
    fn chain_entry(
        &self,
        ctx: &mut AnalysisContext,
        node: NodeId,
        param: &str,
    ) -> Option<ChainEntry> {
        let graph = self.analyzer.graph();
        let mut binding_sites = 0;

        for &site_id in graph.incoming(node) {
            let Some(arg) = graph.call_site(site_id).argument_for(param) else {
                continue;
            };
            binding_sites += 1;
            if !self.is_representative_forward(ctx, site_id, arg, param) {
                return Some(ChainEntry::CallSite(site_id));
            }
        }

        if binding_sites == 0 {
            Some(ChainEntry::Root)
        } else {
            None
        }
    }

    /// Whether `arg` at `site` is the caller relaying one of its own
    /// parameters through its chain edge.
    fn is_representative_forward(
        &self,
        ctx: &mut AnalysisContext,
        site: CallSiteId,
        arg: &Expr,
        callee_param: &str,
    ) -> bool {
        let graph = self.analyzer.graph();
        let Some(name) = arg.as_ident() else {
            return false;
        };
        let is_reactive_param = graph
            .node(site.caller)
            .param(name)
            .map(|p| p.kind.is_reactive())
            .unwrap_or(false);
        if !is_reactive_param {
            return false;
        }

        let usage = self.analyzer.usage(ctx, site.caller, name);
        !usage.is_distribution() && usage.forward_target() == Some((site, callee_param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::call_graph::CallGraphBuilder;
    use crate::analysis::reactive_types::ReactiveTypeClassifier;
    use crate::model::{Annotation, Argument, CompilationUnit, FunctionDecl, ParamDecl, Stmt};
    use pretty_assertions::assert_eq;

    fn composable(name: &str, body: Vec<Stmt>) -> FunctionDecl {
        FunctionDecl::new(name, vec![ParamDecl::new("v", "MutableState<Int>")], body)
            .with_annotation(Annotation::new("Composable"))
    }

    fn reader(name: &str) -> FunctionDecl {
        composable(name, vec![Stmt::expr(Expr::member(Expr::ident("v"), "value"))])
    }

    fn relay(name: &str, callee: &FunctionDecl) -> FunctionDecl {
        composable(
            name,
            vec![Stmt::expr(Expr::call_to(
                callee,
                vec![Argument::positional(Expr::ident("v"))],
            ))],
        )
    }

    fn track(functions: Vec<FunctionDecl>) -> Vec<(Vec<String>, bool, ChainEntry)> {
        let units = vec![CompilationUnit::new("Chain.kt", functions)];
        let classifier = ReactiveTypeClassifier::default();
        let mut ctx = AnalysisContext::new();
        let graph = CallGraphBuilder::new(&classifier, "Composable").build(&units, &mut ctx);
        let analyzer = ConsumptionAnalyzer::new(&graph);
        ChainTracker::new(&analyzer)
            .track(&mut ctx)
            .iter()
            .map(|c| (c.path(&graph), c.is_consumed(), c.entry))
            .collect()
    }

    #[test]
    fn test_root_relay_chain() {
        let d = reader("D");
        let c = relay("C", &d);
        let b = relay("B", &c);

        let chains = track(vec![d, c, b]);
        assert_eq!(
            chains,
            vec![(
                vec!["B".to_string(), "C".to_string(), "D".to_string()],
                true,
                ChainEntry::Root
            )]
        );
    }

    #[test]
    fn test_inner_relays_are_not_heads() {
        let d = reader("D");
        let c = relay("C", &d);
        let b = relay("B", &c);
        let a = FunctionDecl::new(
            "A",
            vec![],
            vec![
                Stmt::local(
                    "v",
                    Expr::library_call(
                        "mutableStateOf",
                        vec![Argument::positional(Expr::literal("0"))],
                    ),
                ),
                Stmt::expr(Expr::call_to(&b, vec![Argument::positional(Expr::ident("v"))])),
            ],
        )
        .with_annotation(Annotation::new("Composable"));

        let chains = track(vec![d, c, b, a]);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].0, vec!["B", "C", "D"]);
        assert!(matches!(chains[0].2, ChainEntry::CallSite(_)));
    }

    #[test]
    fn test_cycle_terminates() {
        // X -> Y -> X, both only forwarding.
        let mut x = composable("X", vec![]);
        let y = relay("Y", &x);
        x.body = vec![Stmt::expr(Expr::call_to(
            &y,
            vec![Argument::positional(Expr::ident("v"))],
        ))];
        let head = relay("Head", &x);

        let chains = track(vec![x, y, head]);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].0, vec!["Head", "X", "Y", "X"]);
        assert!(!chains[0].1);
    }

    #[test]
    fn test_unused_terminal_is_not_consumed() {
        let sink = composable("Sink", vec![]);
        let c = relay("C", &sink);
        let b = relay("B", &c);

        let chains = track(vec![sink, c, b]);
        assert_eq!(chains.len(), 1);
        assert!(!chains[0].1);
    }

    #[test]
    fn test_distribution_ends_chain_and_heads_children() {
        let left = reader("Left");
        let right_leaf = reader("RightLeaf");
        let right = relay("Right", &right_leaf);
        let hub = composable(
            "Hub",
            vec![
                Stmt::expr(Expr::call_to(&left, vec![Argument::positional(Expr::ident("v"))])),
                Stmt::expr(Expr::call_to(&right, vec![Argument::positional(Expr::ident("v"))])),
            ],
        );
        let b = relay("B", &hub);
        let a = relay("A", &b);

        let chains = track(vec![left, right_leaf, right, hub, a, b]);
        let paths: Vec<_> = chains.iter().map(|c| (c.0.clone(), c.1)).collect();
        assert_eq!(
            paths,
            vec![
                (vec!["Right".to_string(), "RightLeaf".to_string()], true),
                (vec!["A".to_string(), "B".to_string(), "Hub".to_string()], true),
            ]
        );
    }

    #[test]
    fn test_chain_qualification() {
        let link = |n| ChainLink::new(NodeId(n), "v");
        let chain = Chain {
            links: vec![link(0), link(1)],
            terminal: ChainTerminal::Consumed(link(2)),
            entry: ChainEntry::Root,
            origin: None,
        };
        assert!(chain.qualifies(2));
        assert!(!chain.qualifies(3));

        let dropped = Chain {
            terminal: ChainTerminal::Unused(link(2)),
            ..chain
        };
        assert!(!dropped.qualifies(1));
    }

    #[test]
    fn test_distribution_without_reader_is_unused() {
        let left = composable("Left", vec![]);
        let right_sink = composable("RightSink", vec![]);
        let right = relay("Right", &right_sink);
        let hub = composable(
            "Hub",
            vec![
                Stmt::expr(Expr::call_to(&left, vec![Argument::positional(Expr::ident("v"))])),
                Stmt::expr(Expr::call_to(&right, vec![Argument::positional(Expr::ident("v"))])),
            ],
        );
        let b = relay("B", &hub);
        let a = relay("A", &b);

        let chains = track(vec![left, right_sink, right, hub, a, b]);
        let paths: Vec<_> = chains.iter().map(|c| (c.0.clone(), c.1)).collect();
        assert_eq!(
            paths,
            vec![
                (vec!["Right".to_string(), "RightSink".to_string()], false),
                (vec!["A".to_string(), "B".to_string(), "Hub".to_string()], false),
            ]
        );
    }

    #[test]
    fn test_distribution_with_reader_behind_relay_is_consumed() {
        let left = composable("Left", vec![]);
        let leaf = reader("Leaf");
        let right = relay("Right", &leaf);
        let hub = composable(
            "Hub",
            vec![
                Stmt::expr(Expr::call_to(&left, vec![Argument::positional(Expr::ident("v"))])),
                Stmt::expr(Expr::call_to(&right, vec![Argument::positional(Expr::ident("v"))])),
            ],
        );
        let b = relay("B", &hub);

        let chains = track(vec![left, leaf, right, hub, b]);
        let hub_chain = chains.iter().find(|c| c.0[0] == "B").unwrap();
        assert_eq!(hub_chain.0, vec!["B", "Hub"]);
        assert!(hub_chain.1);
    }
}
