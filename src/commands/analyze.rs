use crate::analysis::PassThroughAnalyzer;
use crate::config::{self, RelaymapConfig};
use crate::io;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info_span};

pub struct AnalyzeConfig {
    pub paths: Vec<PathBuf>,
    pub format: crate::cli::OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub min_relay_links: Option<usize>,
    pub fail_on_findings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOutcome {
    pub findings: usize,
    pub should_fail: bool,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<AnalyzeOutcome> {
    let _span = info_span!("analyze", paths = config.paths.len()).entered();

    let relaymap_config = resolve_config(config.config.as_ref(), config.min_relay_links)?;

    let files = io::collect_model_files(&config.paths)?;
    debug!(files = files.len(), "Collected model files");
    let units = io::load_all(&files)?;

    let report = PassThroughAnalyzer::new(relaymap_config).analyze(&units);

    let sink = io::open_sink(config.output.as_deref())?;
    let mut writer = io::create_writer(config.format.into(), sink);
    writer
        .write_report(&report)
        .context("Failed to write report")?;

    let findings = report.findings.len();
    Ok(AnalyzeOutcome {
        findings,
        should_fail: config.fail_on_findings && findings > 0,
    })
}

/// Explicit file, else the nearest `.relaymap.toml`; CLI overrides win.
fn resolve_config(path: Option<&PathBuf>, min_relay_links: Option<usize>) -> Result<RelaymapConfig> {
    let mut relaymap_config = match path {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load_config(),
    };

    if let Some(min) = min_relay_links {
        relaymap_config.detection.min_relay_links = min;
    }
    relaymap_config.validate()?;
    Ok(relaymap_config)
}
