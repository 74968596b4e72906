use crate::config::{RelaymapConfig, CONFIG_FILE_NAME};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    write_default_config(&config_path, force)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");
    Ok(())
}

pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let body = toml::to_string_pretty(&RelaymapConfig::default())?;
    fs::write(path, format!("# Relaymap Configuration\n\n{body}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        write_default_config(&path, false).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, RelaymapConfig::default());
    }

    #[test]
    fn test_existing_config_needs_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[detection]\nmin_relay_links = 4\n").unwrap();

        assert!(write_default_config(&path, false).is_err());
        write_default_config(&path, true).unwrap();
        assert_eq!(load_config_from(&path).unwrap().detection.min_relay_links, 2);
    }
}
