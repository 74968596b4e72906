//! Run-scoped analysis state.
//!
//! Every cache lives here and is passed explicitly, so two runs (or two
//! batches analysed in parallel) never share memoised results.

use crate::analysis::call_graph::NodeId;
use crate::analysis::consumption::ParameterUsage;
use crate::core::AnalysisError;
use std::collections::HashMap;

pub type UsageKey = (NodeId, String);

#[derive(Debug, Default)]
pub struct AnalysisContext {
    usage_cache: HashMap<UsageKey, ParameterUsage>,
    errors: Vec<AnalysisError>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached_usage(&self, node: NodeId, param: &str) -> Option<&ParameterUsage> {
        self.usage_cache.get(&(node, param.to_string()))
    }

    pub fn store_usage(&mut self, node: NodeId, param: &str, usage: ParameterUsage) {
        self.usage_cache.insert((node, param.to_string()), usage);
    }

    pub fn cached_usage_count(&self) -> usize {
        self.usage_cache.len()
    }

    pub fn record_error(&mut self, error: AnalysisError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[AnalysisError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<AnalysisError> {
        self.errors
    }
}
