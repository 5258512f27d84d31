//! Conversation with a running agent.

use tokio_util::sync::CancellationToken;

use crate::channel::{AgentChannel, ProcessChannel};
use crate::config::AgentOptions;
use crate::error::{AgentError, AgentResult};
use crate::event::{AgentEvent, Completion};
use crate::protocol::{encode_prompt, parse_line};
use crate::render::EventSink;

/// A single agent conversation.
///
/// Prompts share context: each [`query`](Self::query) continues the same
/// conversation. Only one query runs at a time.
pub struct AgentSession<C> {
    channel: C,
    cancel: Option<CancellationToken>,
    completed_turns: usize,
}

impl AgentSession<ProcessChannel> {
    /// Launch the agent executable and open a session on it.
    pub fn connect(options: &AgentOptions) -> AgentResult<Self> {
        let channel = ProcessChannel::spawn(options)?;
        tracing::info!(
            program = %options.program.display(),
            permission_mode = %options.permission_mode,
            "Agent session ready"
        );
        Ok(Self::new(channel))
    }
}

impl<C: AgentChannel> AgentSession<C> {
    /// Open a session on an already connected channel.
    pub const fn new(channel: C) -> Self {
        Self {
            channel,
            cancel: None,
            completed_turns: 0,
        }
    }

    /// Abort any in-flight query when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Number of queries that reached completion.
    pub const fn completed_turns(&self) -> usize {
        self.completed_turns
    }

    /// Send `prompt` and forward every resulting event to `sink`.
    ///
    /// Returns once the agent reports completion; the completion event is
    /// delivered to `sink` as well. Unparseable output lines are logged and
    /// skipped.
    pub async fn query(
        &mut self,
        prompt: &str,
        sink: &mut dyn EventSink,
    ) -> AgentResult<Completion> {
        tracing::debug!(chars = prompt.len(), "Sending prompt");
        self.channel.send(encode_prompt(prompt)).await?;

        loop {
            let line = tokio::select! {
                biased;

                () = cancelled(self.cancel.as_ref()) => {
                    tracing::info!("Agent query cancelled");
                    return Err(AgentError::Cancelled);
                }
                line = self.channel.recv() => line?,
            };

            let Some(line) = line else {
                return Err(self.closed_early().await);
            };
            if line.trim().is_empty() {
                continue;
            }

            let events = match parse_line(&line) {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unparseable agent output");
                    continue;
                }
            };

            for event in events {
                sink.handle(&event)?;
                if let AgentEvent::Completion(completion) = event {
                    self.completed_turns += 1;
                    tracing::debug!(
                        subtype = %completion.subtype,
                        is_error = completion.is_error,
                        "Agent turn complete"
                    );
                    return Ok(completion);
                }
            }
        }
    }

    /// End the conversation and reap the agent.
    pub async fn close(mut self) -> AgentResult<()> {
        self.channel.close().await
    }

    /// Error for output that ended before completion, preferring the
    /// process exit status when the agent failed.
    async fn closed_early(&mut self) -> AgentError {
        match self.channel.close().await {
            Err(e @ AgentError::ProcessFailed { .. }) => e,
            Err(e) => {
                tracing::debug!(error = %e, "Error closing agent channel");
                AgentError::ChannelClosed
            }
            Ok(()) => AgentError::ChannelClosed,
        }
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending::<()>().await,
    }
}
