//! Loading program-model dumps from disk.

use crate::core::{Error, Result, ResultExt};
use crate::model::CompilationUnit;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const MODEL_EXTENSION: &str = "json";

/// A dump holds either one unit or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ModelFile {
    Many(Vec<CompilationUnit>),
    One(CompilationUnit),
}

pub fn parse_units(contents: &str, path: &Path) -> Result<Vec<CompilationUnit>> {
    let parsed: ModelFile =
        serde_json::from_str(contents).map_err(|e| Error::parse(path, e.to_string()))?;
    Ok(match parsed {
        ModelFile::Many(units) => units,
        ModelFile::One(unit) => vec![unit],
    })
}

pub fn load_units(path: &Path) -> Result<Vec<CompilationUnit>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::file_system(e.to_string(), path))
        .context(format!("Failed to read model file {}", path.display()))?;
    let units = parse_units(&contents, path)?;
    debug!(path = %path.display(), units = units.len(), "Loaded model file");
    Ok(units)
}

/// Model files under each path, sorted so unit order is stable across runs.
/// Plain file arguments are taken as given whatever their extension.
pub fn collect_model_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.exists() {
            return Err(Error::file_system("path does not exist", path));
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(MODEL_EXTENSION))
            .collect();
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

/// Parse every file in parallel, keeping input order in the result.
pub fn load_all(files: &[PathBuf]) -> Result<Vec<CompilationUnit>> {
    let batches = files
        .par_iter()
        .map(|file| load_units(file))
        .collect::<Result<Vec<_>>>()?;
    Ok(batches.into_iter().flatten().collect())
}
