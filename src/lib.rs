// Export modules for library usage
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod model;
pub mod report;

// Re-export commonly used types
pub use crate::analysis::{
    analyze_units, ChainTracker, ConsumptionAnalyzer, FunctionId, PassThroughAnalyzer,
    ReactiveKind, ReactiveTypeClassifier, UsageClassification,
};

pub use crate::config::{load_config, load_config_from, RelaymapConfig};

pub use crate::core::{AnalysisError, Error, Result, Severity};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::model::{CompilationUnit, FunctionDecl};

pub use crate::report::{AnalysisReport, Finding, FindingKind};
