use crate::core::Severity;
use serde::{Deserialize, Serialize};

/// Settings for the pass-through detector itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Annotation that marks a UI-building function.
    #[serde(default = "default_ui_marker")]
    pub ui_marker: String,

    /// Minimum number of relay functions before a chain is reported.
    #[serde(default = "default_min_relay_links")]
    pub min_relay_links: usize,

    #[serde(default)]
    pub severity: Severity,

    /// `@Suppress` ids that silence the finding on a function.
    #[serde(default = "default_suppression_ids")]
    pub suppression_ids: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ui_marker: default_ui_marker(),
            min_relay_links: default_min_relay_links(),
            severity: Severity::default(),
            suppression_ids: default_suppression_ids(),
        }
    }
}

fn default_ui_marker() -> String {
    "Composable".to_string()
}

fn default_min_relay_links() -> usize {
    2
}

fn default_suppression_ids() -> Vec<String> {
    vec![
        "ReactivePassThrough".to_string(),
        "StatePassThrough".to_string(),
    ]
}
