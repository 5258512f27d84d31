//! CLI-specific error types and mappings.
//!
//! Maps record and agent errors to exit codes and user-facing messages.

use std::io;

use sandbox_agent::AgentError;
use sandbox_core::RecordError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Clone, Error)]
pub enum CliError {
    /// The input payload does not satisfy its record contract.
    #[error("Invalid payload: {0}")]
    Data(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// The agent could not be started or stopped unexpectedly.
    #[error("Agent unavailable: {0}")]
    Unavailable(String),

    /// The agent spoke something other than its protocol.
    #[error("Agent protocol error: {0}")]
    Protocol(String),

    /// Interrupted by the user.
    #[error("Interrupted")]
    Interrupted,

    /// Anything else.
    #[error("{0}")]
    General(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Invalid arguments (reported by clap before any command runs)
    /// - 64-78: Specific error categories (see sysexits.h)
    /// - 130: Terminated by Ctrl+C
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::General(_) => 1,
            Self::Data(_) => 65,        // EX_DATAERR
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,          // EX_IOERR
            Self::Protocol(_) => 76,    // EX_PROTOCOL
            Self::Interrupted => 130,
        }
    }

    /// Classify an error report by the first known error in its chain.
    pub fn classify(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<RecordError>() {
                return Self::from(e);
            }
            if let Some(e) = cause.downcast_ref::<AgentError>() {
                return Self::from(e);
            }
            if let Some(e) = cause.downcast_ref::<io::Error>() {
                return Self::Io(e.to_string());
            }
        }
        Self::General(err.to_string())
    }
}

impl From<&RecordError> for CliError {
    fn from(err: &RecordError) -> Self {
        Self::Data(err.to_string())
    }
}

impl From<&AgentError> for CliError {
    fn from(err: &AgentError) -> Self {
        match err {
            AgentError::Io(e) => Self::Io(e.to_string()),
            AgentError::Protocol(e) => Self::Protocol(e.to_string()),
            AgentError::Cancelled => Self::Interrupted,
            AgentError::Spawn { .. }
            | AgentError::ChannelClosed
            | AgentError::ProcessFailed { .. } => Self::Unavailable(err.to_string()),
        }
    }
}
