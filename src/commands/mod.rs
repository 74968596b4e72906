//! CLI command implementations.
//!
//! - **analyze**: load program-model dumps and report pass-through chains
//! - **init**: write a default `.relaymap.toml`

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig, AnalyzeOutcome};
pub use init::init_config;
