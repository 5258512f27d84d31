//! Error types for the agent driver.

use std::io;

use thiserror::Error;

use crate::protocol::ProtocolError;

const CANCELLED_MSG: &str = "agent query cancelled";

/// Errors raised while talking to the agent process.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The agent executable could not be started.
    #[error("Failed to start agent `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the agent failed.
    #[error("Agent I/O error: {0}")]
    Io(#[from] io::Error),

    /// The agent produced output that is not valid protocol JSON.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The agent's output ended before a completion arrived.
    #[error("Agent channel closed before the response completed")]
    ChannelClosed,

    /// The query was cancelled by the caller.
    #[error("{}", CANCELLED_MSG)]
    Cancelled,

    /// The agent process exited unsuccessfully.
    #[error("Agent process failed ({status}): {stderr}")]
    ProcessFailed { status: String, stderr: String },
}

/// Result alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
