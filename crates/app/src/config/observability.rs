//! Logging Config

use clap::{ArgAction, Args, ValueEnum};
use tracing::Level;

/// Crates whose events follow the configured level. The binary logs under
/// `solarstore` as well.
const CLIENT_TARGETS: [&str; 2] = ["solarstore", "solarstore_app"];

/// Level applied to everything else, HTTP plumbing included.
const DEPENDENCY_LEVEL: Level = Level::WARN;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Single-line, human-readable logs.
    #[default]
    Compact,

    /// One JSON object per event, for piping into other tools.
    Json,
}

/// Logging settings.
///
/// Logs are for diagnosing the client itself, so the level only applies to
/// the solarstore crates. Setting `RUST_LOG` replaces the whole filter.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level for solarstore events (trace, debug, info, warn, error)
    #[arg(long, env = "SOLARSTORE_LOG", default_value_t = Level::WARN, global = true)]
    pub log_level: Level,

    /// Raise the log level one step per flag
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

impl LoggingConfig {
    /// Level after applying `--verbose`.
    #[must_use]
    pub fn effective_level(&self) -> Level {
        let mut level = self.log_level;

        for _ in 0..self.verbose {
            level = match level {
                Level::ERROR => Level::WARN,
                Level::WARN => Level::INFO,
                Level::INFO => Level::DEBUG,
                _ => Level::TRACE,
            };
        }

        level
    }

    /// Filter directives for the subscriber, used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directives(&self) -> String {
        let level = self.effective_level().to_string().to_lowercase();
        let default = DEPENDENCY_LEVEL.min(self.effective_level());

        std::iter::once(default.to_string().to_lowercase())
            .chain(CLIENT_TARGETS.iter().map(|target| format!("{target}={level}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}
