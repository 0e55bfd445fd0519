//! Line-oriented front-end: prints the room, reads commands from stdin.

use std::io::{self, Write};
use std::sync::Arc;

use jobchat_core::{JobId, LastMessage, RoomId, UserId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::sync::Mutex;
use tracing::warn;

use crate::ui::{Interaction, ViewHooks};

pub const HELP: &str = "\
commands:
  <text>            send a message
  /apply <job>      apply to a job
  /bookmark <job>   toggle a bookmark
  /delete <job>     delete a job posting
  /leave            leave this room
  /quit             close the client";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Apply(JobId),
    Bookmark(JobId),
    Delete(JobId),
    Leave,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Command::Say(line.to_string());
        };
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let job = parts.next().map(str::parse::<JobId>);
        match (name, job) {
            ("apply", Some(Ok(id))) => Command::Apply(id),
            ("bookmark", Some(Ok(id))) => Command::Bookmark(id),
            ("delete", Some(Ok(id))) => Command::Delete(id),
            ("leave", None) => Command::Leave,
            ("quit" | "exit", None) => Command::Quit,
            ("help", _) => Command::Help,
            _ => Command::Invalid(line.to_string()),
        }
    }
}

/// The one reader of stdin. Commands and confirmation answers come from the
/// same line stream, so a pasted `/leave` followed by `y` is read in order.
#[derive(Debug, Clone)]
pub struct StdinLines {
    rx: Arc<Mutex<UnboundedReceiver<String>>>,
}

impl StdinLines {
    /// Starts the reader task over the process stdin.
    pub fn spawn() -> Self {
        let (tx, rx) = unbounded_channel();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
        });
        Self::from_receiver(rx)
    }

    pub fn from_receiver(rx: UnboundedReceiver<String>) -> Self {
        Self { rx: Arc::new(Mutex::new(rx)) }
    }

    /// Next line, `None` once stdin is closed.
    pub async fn next_line(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "예" | "네")
}

/// Confirmations from the shared stdin lines, notifications and navigation on stdout.
#[derive(Debug, Clone)]
pub struct TerminalUi {
    lines: StdinLines,
}

impl TerminalUi {
    pub fn new(lines: StdinLines) -> Self {
        Self { lines }
    }
}

impl Interaction for TerminalUi {
    // Needs the multi-thread runtime: the worker blocks until the answer line arrives.
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        let answer = tokio::task::block_in_place(|| Handle::current().block_on(self.lines.next_line()));
        answer.as_deref().is_some_and(is_yes)
    }

    fn notify(&self, message: &str) {
        println!("[알림] {message}");
    }

    fn navigate(&self, path: &str) {
        println!("→ {path}");
    }
}

/// Shows read receipts and badge counts as status lines.
#[derive(Debug, Default)]
pub struct TerminalHooks;

impl ViewHooks for TerminalHooks {
    fn read_state_changed(&self, _room_id: RoomId, _reader_id: Option<UserId>) {
        println!("  (읽음)");
    }

    fn unread_total_changed(&self, count: u64) {
        tracing::debug!(count, "unread total");
    }

    fn last_message_changed(&self, last: &LastMessage) {
        tracing::debug!(room_id = last.room_id, "room list needs refresh");
    }
}
