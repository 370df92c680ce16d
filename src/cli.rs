use clap::{Parser, Subcommand};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::form::{FormValidator, JobFormInput, ValidationResult, COMMON_CRON_EXPRESSIONS};

#[derive(Parser, Debug)]
#[command(name = "job-form-validator", version, about = "Validate scheduled-job forms")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP validation service (default)
    Serve {
        /// Bind address, overrides HOST
        #[arg(long)]
        host: Option<String>,
        /// Bind port, overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate a JSON job form snapshot; reads stdin when no file is given
    Check {
        file: Option<PathBuf>,
        /// Pretty-print the verdict
        #[arg(long)]
        pretty: bool,
    },
    /// List the built-in cron presets
    Presets,
}

#[derive(Debug)]
pub enum CliError {
    /// Input could not be read
    Io(io::Error),

    /// Input is not a job form
    Parse(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "Failed to read job form: {}", e),
            CliError::Parse(e) => write!(f, "Failed to parse job form: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Parse(err)
    }
}

/// Parse one form snapshot and validate it
pub fn check_form(reader: impl Read) -> Result<ValidationResult, CliError> {
    let input: JobFormInput = serde_json::from_reader(reader)?;
    debug!("Checking job form '{}'", input.name.trim());
    Ok(FormValidator::validate(&input))
}

/// Validate the form at `path`, or stdin when `None`
pub fn check_path(path: Option<&Path>) -> Result<ValidationResult, CliError> {
    match path {
        Some(path) => {
            info!("Reading job form from {}", path.display());
            check_form(BufReader::new(File::open(path)?))
        }
        None => check_form(io::stdin().lock()),
    }
}

/// Render a verdict for the terminal
pub fn render(result: &ValidationResult, pretty: bool) -> Result<String, CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(rendered)
}

/// One line per preset: expression, then name
pub fn render_presets() -> String {
    COMMON_CRON_EXPRESSIONS
        .iter()
        .map(|preset| format!("{:<12} {}", preset.expression, preset.name))
        .collect::<Vec<_>>()
        .join("\n")
}
