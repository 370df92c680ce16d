use std::env;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Configuration value that is present but unusable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid value for {}: '{}'", self.var, self.value)
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server binds to
    /// Default: 127.0.0.1
    pub host: String,

    /// Port the HTTP server binds to
    /// Default: 8080
    pub port: u16,

    /// Maximum JSON payload size for all requests (in bytes)
    /// Default: 1MB (1024 * 1024)
    pub max_payload_size: usize,

    /// Maximum number of forms accepted by one bulk validation request
    /// Default: 100
    pub max_bulk_forms: usize,

    /// HTTP worker threads; actix picks one per core when unset
    pub num_workers: Option<usize>,

    /// Directory for rolling log files
    /// Default: logs
    pub log_dir: String,
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError { var, value }),
    }
}

/// Sizes and counts must be at least 1; "0" is reported like any other bad value
fn parse_count(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<usize>, ConfigError> {
    Ok(parse_var::<NonZeroUsize>(lookup, var)?.map(NonZeroUsize::get))
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - HOST: bind address (default: 127.0.0.1)
    /// - PORT: bind port (default: 8080)
    /// - MAX_PAYLOAD_SIZE: maximum request payload size in bytes (default: 1048576 = 1MB)
    /// - MAX_BULK_FORMS: forms per bulk request (default: 100)
    /// - NUM_WORKERS: HTTP worker threads (default: one per core)
    /// - LOG_DIR: log directory (default: logs)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&lookup, "PORT")?.unwrap_or(8080),
            max_payload_size: parse_count(&lookup, "MAX_PAYLOAD_SIZE")?.unwrap_or(1024 * 1024),
            max_bulk_forms: parse_count(&lookup, "MAX_BULK_FORMS")?.unwrap_or(100),
            num_workers: parse_count(&lookup, "NUM_WORKERS")?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}
