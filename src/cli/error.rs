//! CLI error types and conversions

use crate::harvester::HarvestError;
use crate::output::OutputError;
use crate::window::WindowError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Harvest error
    #[error("harvest error: {0}")]
    HarvestError(#[from] HarvestError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Window error
    #[error("window error: {0}")]
    WindowError(#[from] WindowError),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConfigurationError(_)
            | CliError::WindowError(_)
            | CliError::HarvestError(HarvestError::Configuration(_)) => 2,
            CliError::HarvestError(e) if e.is_interrupted() => 130,
            _ => 1,
        }
    }
}
