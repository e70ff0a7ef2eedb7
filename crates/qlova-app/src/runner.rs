//! Conversation drivers: the interactive prompt and the scripted sample.

use std::io::Write;

use qlova_client::{ClientBuilder, ClientError, ConversationClient, SendOutcome};
use qlova_intent::SlotSpec;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT: &str = ">>> ";

/// Errors that stop a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Register the demo intent used by the sample when nothing is configured.
pub fn with_demo_intents(builder: ClientBuilder) -> ClientBuilder {
    builder.register_intent(
        "BirthDayIntent",
        r"(\d+)/(\d+)",
        vec![SlotSpec::capture("month"), SlotSpec::capture("day")],
    )
}

/// Print spoken and reprompt lines of one outcome.
pub fn print_outcome<W: Write>(out: &mut W, outcome: &SendOutcome) -> std::io::Result<()> {
    match outcome {
        SendOutcome::Delivered(exchange) => {
            for message in &exchange.messages {
                writeln!(out, "-> {}", message)?;
            }
            for message in &exchange.reprompt_messages {
                writeln!(out, "reprompt-> {}", message)?;
            }
        }
        SendOutcome::SessionEnded => writeln!(out, "(Session Ended)")?,
    }
    out.flush()
}

/// Launch, then send each non-blank input line until EOF or the session ends.
pub async fn run_interactive<R, W>(
    client: &mut ConversationClient,
    input: R,
    out: &mut W,
) -> Result<(), RunError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let outcome = client.send_launch_request().await?;
    print_outcome(out, &outcome)?;

    let mut lines = input.lines();
    while !client.session_ended() {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let outcome = client.send_intent_request(text).await?;
        print_outcome(out, &outcome)?;
    }

    tracing::info!(ended = client.session_ended(), "Interactive session finished");
    Ok(())
}

/// Launch, then send each utterance in order, stopping once the session ends.
///
/// Returns how many utterances were actually sent.
pub async fn run_sample<W: Write>(
    client: &mut ConversationClient,
    utterances: &[String],
    out: &mut W,
) -> Result<usize, RunError> {
    let outcome = client.send_launch_request().await?;
    print_outcome(out, &outcome)?;

    let mut sent = 0;
    for text in utterances {
        if client.session_ended() {
            break;
        }
        writeln!(out, "{}{}", PROMPT, text)?;
        let outcome = client.send_intent_request(text).await?;
        print_outcome(out, &outcome)?;
        sent += 1;
    }

    tracing::info!(sent, total = utterances.len(), "Sample finished");
    Ok(sent)
}
