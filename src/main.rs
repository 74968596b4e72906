use anyhow::Result;
use relaymap::cli::{self, Commands};
use relaymap::commands::{self, AnalyzeConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "RELAYMAP_LOG";

fn main() -> Result<()> {
    let cli = cli::parse_args();
    init_logging(cli.command.verbosity());

    match cli.command {
        Commands::Analyze {
            paths,
            format,
            output,
            config,
            min_relay_links,
            fail_on_findings,
            verbosity: _,
        } => {
            let outcome = commands::handle_analyze(AnalyzeConfig {
                paths,
                format,
                output,
                config,
                min_relay_links,
                fail_on_findings,
            })?;
            if outcome.should_fail {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => commands::init_config(force),
    }
}

/// `RELAYMAP_LOG` wins; otherwise `-v` picks the level.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
