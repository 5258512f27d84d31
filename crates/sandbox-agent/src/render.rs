//! Event sinks.

use std::io::{self, Write};

use crate::event::AgentEvent;

/// Receives events as a query produces them.
pub trait EventSink: Send {
    /// Handle one event. An error aborts the query.
    fn handle(&mut self, event: &AgentEvent) -> io::Result<()>;
}

/// Collects events in memory.
impl EventSink for Vec<AgentEvent> {
    fn handle(&mut self, event: &AgentEvent) -> io::Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

/// Writes a live transcript: text verbatim, one marker line per tool call,
/// and a closing marker with the completion subtype.
pub struct TerminalRenderer<W> {
    out: W,
}

impl TerminalRenderer<io::Stdout> {
    /// Renderer on the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Renderer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EventSink for TerminalRenderer<W> {
    fn handle(&mut self, event: &AgentEvent) -> io::Result<()> {
        match event {
            AgentEvent::TextDelta(text) => write!(self.out, "{text}")?,
            AgentEvent::ToolInvocation { name, .. } => writeln!(self.out, "\n[Tool: {name}]")?,
            AgentEvent::Completion(done) => writeln!(self.out, "\n[Done: {}]", done.subtype)?,
        }
        self.out.flush()
    }
}
