//! Line-oriented chat loop on stdin/stdout.

use crate::cli::Mode;
use crate::types::AppEvent;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

pub const GREETING: &str =
    "👋 Hi! I'm your NFL Sports AI. Ask me anything about players, teams, or stats.";
pub const GOODBYE: &str = "Goodbye! Thanks for chatting about football.";

const HELP: &str = "Commands:\n  /reset  start a fresh conversation\n  /help   show this message\n  exit    leave the chat";

pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    ["exit", "quit", "/exit"]
        .iter()
        .any(|sentinel| line.eq_ignore_ascii_case(sentinel))
}

pub struct Repl {
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
    mode: Mode,
}

impl Repl {
    pub fn new(tx: mpsc::Sender<AppEvent>, rx: mpsc::Receiver<AppEvent>, mode: Mode) -> Self {
        Self { tx, rx, mode }
    }

    /// Read questions from `input` until an exit command or EOF, writing the
    /// conversation to `out`.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{}", GREETING)?;
        writeln!(out, "Mode: {}.", self.mode.label())?;
        writeln!(out, "Type 'exit' at any time to quit. \n")?;

        let mut lines = input.lines();
        loop {
            write!(out, "You: ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };
            let line = line.trim();

            if is_exit_command(line) {
                break;
            }
            match line {
                "" => continue,
                "/help" => {
                    writeln!(out, "{}\n", HELP)?;
                    continue;
                }
                "/reset" => self.tx.send(AppEvent::ResetConversation).await?,
                question => self.tx.send(AppEvent::UserInput(question.to_string())).await?,
            }

            self.print_turn(out).await?;
        }

        writeln!(out, "{}", GOODBYE)?;
        Ok(())
    }

    async fn print_turn<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let mut streaming = false;

        while let Some(event) = self.rx.recv().await {
            match event {
                AppEvent::AgentStreamChunk(chunk) => {
                    if !streaming {
                        write!(out, "\nAI: ")?;
                        streaming = true;
                    }
                    write!(out, "{}", chunk)?;
                    out.flush()?;
                }
                AppEvent::AgentStreamEnd => {
                    if streaming {
                        writeln!(out, "\n")?;
                        streaming = false;
                    }
                }
                AppEvent::AgentMessage(message) => writeln!(out, "\nAI: {}\n", message)?,
                AppEvent::ToolRequest(calls) => {
                    if streaming {
                        writeln!(out)?;
                        streaming = false;
                    }
                    let names: Vec<&str> = calls.iter().map(|c| c.function.name.as_str()).collect();
                    writeln!(out, "  [fetching live data: {}]", names.join(", "))?;
                }
                AppEvent::ToolResult(name, output) => {
                    debug!("Tool '{}' returned {} chars", name, output.len());
                }
                AppEvent::FallbackAnswer(answer) => {
                    writeln!(out, "\nAI (offline): {}\n", answer)?;
                }
                AppEvent::Error(error) => {
                    if streaming {
                        writeln!(out)?;
                        streaming = false;
                    }
                    writeln!(out, "An error occurred: {}", error)?;
                }
                AppEvent::TurnComplete => return Ok(()),
                AppEvent::UserInput(_) | AppEvent::ResetConversation => {}
            }
        }

        Err(anyhow::anyhow!("The chat engine stopped unexpectedly"))
    }
}
