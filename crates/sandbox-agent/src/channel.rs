//! Line-oriented transport to the agent.
//!
//! [`StdioChannel`] spawns the agent executable and speaks to it over its
//! stdin/stdout. The agent's stderr is drained in the background: each line
//! is forwarded to `tracing` according to the session's [`SdkLogConfig`], and
//! the last few lines are kept for error reports.

use std::collections::VecDeque;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines,
};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::Level;

use crate::config::{AgentOptions, SdkLogConfig};
use crate::error::{AgentError, AgentResult};

/// Stderr lines kept for [`AgentError::ProcessFailed`].
const STDERR_TAIL_LINES: usize = 20;

/// Bidirectional line channel to an agent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentChannel: Send {
    /// Send one protocol line.
    async fn send(&mut self, line: String) -> AgentResult<()>;

    /// Receive the next line, or `None` once the agent's output has ended.
    async fn recv(&mut self) -> AgentResult<Option<String>>;

    /// Close the input side and reap the agent.
    async fn close(&mut self) -> AgentResult<()>;
}

/// Channel over the stdio of a spawned agent process.
pub type ProcessChannel = StdioChannel<ChildStdout, ChildStdin>;

/// [`AgentChannel`] over an async reader/writer pair.
pub struct StdioChannel<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
    child: Option<Child>,
    stderr_task: Option<JoinHandle<Vec<String>>>,
}

impl<R, W> StdioChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Wrap an existing reader/writer pair.
    pub fn from_io(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            child: None,
            stderr_task: None,
        }
    }
}

impl ProcessChannel {
    /// Spawn the agent described by `options`.
    pub fn spawn(options: &AgentOptions) -> AgentResult<Self> {
        let program = options.program.display().to_string();
        let args = options.command_args();

        let mut cmd = Command::new(&options.program);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &options.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(program = %program, args = args.len(), "Spawning agent");

        let mut child = cmd.spawn().map_err(|source| AgentError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

        let stderr_task = tokio::spawn(drain_stderr(stderr, options.sdk_log));

        let mut channel = Self::from_io(stdout, stdin);
        channel.child = Some(child);
        channel.stderr_task = Some(stderr_task);
        Ok(channel)
    }
}

#[async_trait]
impl<R, W> AgentChannel for StdioChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, line: String) -> AgentResult<()> {
        let mut payload = line;
        payload.push('\n');
        self.writer.write_all(payload.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn recv(&mut self) -> AgentResult<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    async fn close(&mut self) -> AgentResult<()> {
        // The agent may already be gone; a broken pipe here is not an error.
        if let Err(e) = self.writer.shutdown().await {
            tracing::debug!(error = %e, "Agent stdin already closed");
        }

        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        // Keep reading stdout until the agent exits; it may still be writing.
        let mut discarded = 0usize;
        let mut stdout_open = true;
        let status = loop {
            tokio::select! {
                status = child.wait() => break status?,
                line = self.lines.next_line(), if stdout_open => match line {
                    Ok(Some(_)) => discarded += 1,
                    _ => stdout_open = false,
                },
            }
        };
        if discarded > 0 {
            tracing::debug!(lines = discarded, "Discarded agent output after close");
        }

        let stderr_tail = match self.stderr_task.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => Vec::new(),
        };

        if status.success() {
            tracing::debug!(%status, "Agent exited");
            Ok(())
        } else {
            Err(AgentError::ProcessFailed {
                status: status.to_string(),
                stderr: stderr_tail.join("\n"),
            })
        }
    }
}

fn missing_pipe(name: &str) -> AgentError {
    AgentError::Io(std::io::Error::other(format!("agent {name} not captured")))
}

async fn drain_stderr(stderr: ChildStderr, config: SdkLogConfig) -> Vec<String> {
    let mut lines = BufReader::new(stderr).lines();
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        forward_line(&config, &line);

        if tail.len() == STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }

    tail.into()
}

/// Emit one agent stderr line through `tracing` if the config allows it.
pub(crate) fn forward_line(config: &SdkLogConfig, line: &str) -> bool {
    let level = SdkLogConfig::classify(line);
    if !config.forwards(level) {
        return false;
    }

    if level == Level::ERROR {
        tracing::error!(target: "sandbox_agent::sdk", "{line}");
    } else if level == Level::WARN {
        tracing::warn!(target: "sandbox_agent::sdk", "{line}");
    } else if level == Level::INFO {
        tracing::info!(target: "sandbox_agent::sdk", "{line}");
    } else if level == Level::DEBUG {
        tracing::debug!(target: "sandbox_agent::sdk", "{line}");
    } else {
        tracing::trace!(target: "sandbox_agent::sdk", "{line}");
    }
    true
}
