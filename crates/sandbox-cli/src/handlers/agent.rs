//! Agent command handler.
//!
//! Runs a single prompt, or reads prompts line by line until EOF or `exit`.
//! All prompts share one agent conversation.

use std::io::Write;

use anyhow::Result;
use sandbox_agent::{
    AgentChannel, AgentError, AgentSession, CancellationToken, EventSink, TerminalRenderer,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::commands::AgentArgs;

/// Words that end an interactive session.
const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

/// Execute the agent command.
pub async fn execute(args: AgentArgs) -> Result<()> {
    let options = args.to_options();

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut session = AgentSession::connect(&options)?.with_cancellation(cancel.clone());
    let mut renderer = TerminalRenderer::stdout();

    let outcome = match &args.prompt {
        Some(prompt) => run_turn(&mut session, prompt, &mut renderer).await,
        None => {
            println!("Agent is ready. Type a prompt, or 'exit' to quit.");
            let stdin = BufReader::new(tokio::io::stdin());
            interactive(&mut session, stdin, &cancel, &mut renderer, &mut std::io::stdout())
                .await
                .map(|_| ())
        }
    };

    // On failure the agent process is killed when the session drops.
    outcome?;
    session.close().await?;
    Ok(())
}

/// Run one prompt and report agent-side failures.
async fn run_turn<C: AgentChannel>(
    session: &mut AgentSession<C>,
    prompt: &str,
    sink: &mut dyn EventSink,
) -> Result<(), AgentError> {
    let completion = session.query(prompt, sink).await?;
    if completion.is_error {
        tracing::warn!(subtype = %completion.subtype, "Agent reported an error for this turn");
    }
    Ok(())
}

/// Read prompts from `input` until EOF or an exit word.
///
/// Returns the number of prompts sent. Cancelling `cancel` while waiting
/// for input ends the loop with [`AgentError::Cancelled`].
pub async fn interactive<C, R>(
    session: &mut AgentSession<C>,
    input: R,
    cancel: &CancellationToken,
    sink: &mut dyn EventSink,
    out: &mut dyn Write,
) -> Result<usize, AgentError>
where
    C: AgentChannel,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut sent = 0;

    loop {
        write!(out, "\n> ")?;
        out.flush()?;

        let line = tokio::select! {
            biased;

            () = cancel.cancelled() => {
                writeln!(out)?;
                return Err(AgentError::Cancelled);
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&prompt) {
            break;
        }

        run_turn(session, prompt, sink).await?;
        sent += 1;
    }

    writeln!(out)?;
    Ok(sent)
}
