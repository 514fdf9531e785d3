use clap::{Args, CommandFactory, Parser};
use std::path::PathBuf;

use lingo_config::{ConfigLoader, LingoConfig};
use lingo_core::LingoError;

mod generate;
mod listen;
mod practice;

pub use generate::GenerateCli;
pub use listen::ListenCli;
pub use practice::Cli;

/// Flags shared by every lingo binary.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Path to lingo.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl CommonArgs {
    /// Load the config, then install the tracing subscriber it asks for.
    pub fn init(&self) -> lingo_core::Result<LingoConfig> {
        let config = ConfigLoader::load(self.config.as_deref())?.get();

        // Resolve log level: --verbose > --quiet > --log-level > config default
        let log_level = self.log_level(&config);

        // Logs go to stderr: stdout may be carrying example records.
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));
        if config.logging.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .with_target(true)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }

        Ok(config)
    }

    fn log_level(&self, config: &LingoConfig) -> String {
        if self.verbose {
            "debug".into()
        } else if self.quiet {
            "error".into()
        } else {
            self.log_level
                .clone()
                .unwrap_or_else(|| config.logging.level.clone())
        }
    }
}

/// Parse the command line. Malformed arguments print usage to stderr and
/// exit with status 1; `--help` and `--version` exit with 0.
pub fn parse_args<P: Parser>() -> P {
    P::try_parse().unwrap_or_else(|e| {
        if e.use_stderr() {
            let _ = e.print();
            std::process::exit(1);
        }
        e.exit()
    })
}

/// Print an error the way the binaries report it and return the exit status.
pub fn report_error<P: CommandFactory>(error: &LingoError) -> i32 {
    eprintln!("Error: {error}");
    if error.is_usage() {
        eprintln!("{}", P::command().render_usage());
    }
    error.exit_code()
}
