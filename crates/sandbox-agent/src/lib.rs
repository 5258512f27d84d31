//! Driver for a conversational coding agent.
//!
//! The agent runs as a child process speaking stream-JSON over stdio. A
//! [`AgentSession`] sends prompts and turns the agent's output into
//! [`AgentEvent`]s: text deltas, tool invocations, and a final completion.
//!
//! ```no_run
//! use sandbox_agent::{AgentOptions, AgentSession, TerminalRenderer};
//!
//! # async fn run() -> sandbox_agent::AgentResult<()> {
//! let options = AgentOptions::for_sandbox("https://80-sbx.proxy.example.com");
//! let mut session = AgentSession::connect(&options)?;
//! let mut renderer = TerminalRenderer::stdout();
//! session.query("Start a web server on port 80", &mut renderer).await?;
//! session.close().await
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

mod channel;
mod config;
mod error;
mod event;
pub mod protocol;
mod render;
mod session;

pub use channel::{AgentChannel, ProcessChannel, StdioChannel};
pub use config::{
    AgentOptions, DEFAULT_AGENT_PROGRAM, DEFAULT_ALLOWED_TOOLS, PermissionMode, SdkLogConfig,
    sandbox_system_prompt,
};
pub use error::{AgentError, AgentResult};
pub use event::{AgentEvent, Completion};
pub use protocol::ProtocolError;
pub use render::{EventSink, TerminalRenderer};
pub use session::AgentSession;

// Re-exported so callers can build cancellation tokens and log filters
// without depending on these crates directly.
pub use tokio_util::sync::CancellationToken;
pub use tracing::level_filters::LevelFilter;
