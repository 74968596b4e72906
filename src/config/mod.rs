mod detection;
mod loader;
mod reactive_types;

pub use detection::DetectionConfig;
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
pub use reactive_types::ReactiveTypesConfig;

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root of `.relaymap.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelaymapConfig {
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub reactive_types: ReactiveTypesConfig,
}

impl RelaymapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.detection.min_relay_links == 0 {
            return Err(Error::Configuration(
                "detection.min_relay_links must be at least 1".to_string(),
            ));
        }
        if self.detection.ui_marker.trim().is_empty() {
            return Err(Error::Configuration(
                "detection.ui_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;

    #[test]
    fn test_defaults_are_valid() {
        let config = RelaymapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.min_relay_links, 2);
        assert_eq!(config.detection.ui_marker, "Composable");
        assert_eq!(config.detection.severity, Severity::Warning);
    }

    #[test]
    fn test_zero_relay_links_rejected() {
        let mut config = RelaymapConfig::default();
        config.detection.min_relay_links = 0;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_blank_marker_rejected() {
        let mut config = RelaymapConfig::default();
        config.detection.ui_marker = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
