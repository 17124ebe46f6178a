use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{self, ConfigBuilder, TermLogger};

/// Crates of the HTTP stack that log every accepted connection and body poll.
/// They are silenced unless the level is Trace.
const FILTERED_MODULES: &[&str] = &["hyper", "hyper_util", "axum", "tower", "tokio"];

/// What the terminal logger will show, derived from the command line.
#[derive(Debug, PartialEq)]
struct LogSettings {
    level: simplelog::LevelFilter,
    quiet_dependencies: bool,
}

impl LogSettings {
    fn from_level(level: LevelFilter) -> Self {
        Self {
            level: level_to_simplelog(level),
            quiet_dependencies: level != LevelFilter::Trace,
        }
    }

    fn logger_config(&self) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        // The module path says which layer a line came from.
        builder.set_target_level(simplelog::LevelFilter::Error);

        if self.quiet_dependencies {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}

fn level_to_simplelog(level: LevelFilter) -> simplelog::LevelFilter {
    match level {
        LevelFilter::Off => simplelog::LevelFilter::Off,
        LevelFilter::Error => simplelog::LevelFilter::Error,
        LevelFilter::Warn => simplelog::LevelFilter::Warn,
        LevelFilter::Info => simplelog::LevelFilter::Info,
        LevelFilter::Debug => simplelog::LevelFilter::Debug,
        LevelFilter::Trace => simplelog::LevelFilter::Trace,
    }
}

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger. Fails if a logger is already set.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let settings = LogSettings::from_level(config.log_level_filter);

        TermLogger::init(
            settings.level,
            settings.logger_config(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }
}
