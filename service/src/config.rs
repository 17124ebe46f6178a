use clap::builder::TypedValueParser as _;
use clap::Parser;
use log::LevelFilter;

/// Address the server binds to unless told otherwise: port 3000 on all
/// interfaces.
pub const DEFAULT_ADDR: &str = ":3000";

const ALL_INTERFACES: &str = "0.0.0.0";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// HTTP address to bind to, as `host:port` or `:port` for all interfaces
    #[arg(short, long, default_value = DEFAULT_ADDR)]
    addr: String,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from([env!("CARGO_PKG_NAME")])
    }
}

impl Config {
    pub fn new() -> Self {
        // Parse the command line parameters and flags
        Config::parse()
    }

    pub fn set_addr(mut self, addr: &str) -> Self {
        self.addr = addr.to_string();
        self
    }

    /// The address as given on the command line.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// The address in a form `TcpListener::bind` accepts. A bare `:port`
    /// listens on every interface.
    pub fn bind_addr(&self) -> String {
        if self.addr.starts_with(':') {
            format!("{ALL_INTERFACES}{}", self.addr)
        } else {
            self.addr.clone()
        }
    }
}
