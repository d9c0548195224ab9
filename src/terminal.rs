//! Line-oriented terminal front end.
//!
//! Commands are read from stdin on a plain thread so a blocked read never
//! holds up runtime shutdown. Snapshots are rendered to stdout; logs stay on
//! stderr.

use anyhow::{Context, Result};
use rsvp_core::{Navigation, PlaybackSnapshot, SessionCommand};
use std::io::{BufRead, Write};
use std::thread;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

pub const HELP: &str =
    "commands: p/enter toggle, + faster, - slower, w <wpm>, l <document>, s status, q quit";

/// Parse one input line into a session command.
pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "" | "p" => Ok(SessionCommand::TogglePlayPause),
        "play" => Ok(SessionCommand::Play),
        "pause" => Ok(SessionCommand::Pause),
        "+" => Ok(SessionCommand::RateUp),
        "-" => Ok(SessionCommand::RateDown),
        "s" => Ok(SessionCommand::GetSnapshot),
        "q" | "b" => Ok(SessionCommand::Back),
        "w" => rest
            .parse::<i32>()
            .map(|wpm| SessionCommand::SetRate { wpm })
            .map_err(|_| format!("expected a number after `w`, got `{rest}`")),
        "l" if !rest.is_empty() => Ok(SessionCommand::Load {
            document_id: rest.to_string(),
        }),
        "l" => Err("expected a document after `l`".to_string()),
        other => Err(format!("unknown command `{other}`")),
    }
}

pub fn render_line(snapshot: &PlaybackSnapshot) -> String {
    if snapshot.loading {
        return "[loading]".to_string();
    }
    if let Some(failure) = &snapshot.error {
        return format!("[error] {}", failure.message);
    }
    let position = if snapshot.total == 0 {
        0
    } else {
        snapshot.cursor + 1
    };
    let percent = (snapshot.progress_fraction * 100.0).round() as u32;
    format!(
        "[{}] {} WPM {}/{} {:>3}%  {}",
        snapshot.status, snapshot.rate, position, snapshot.total, percent, snapshot.current_word
    )
}

fn format_snapshot(snapshot: &PlaybackSnapshot, json: bool) -> Result<String> {
    if json {
        serde_json::to_string(snapshot).context("Failed to encode snapshot")
    } else {
        Ok(render_line(snapshot))
    }
}

/// Print a line for every distinct snapshot until the session goes away.
pub async fn render_snapshots(
    mut snapshots: watch::Receiver<PlaybackSnapshot>,
    json: bool,
) -> Result<()> {
    let mut last_line = String::new();
    loop {
        let line = format_snapshot(&snapshots.borrow_and_update(), json)?;
        if line != last_line {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{line}").context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
            last_line = line;
        }
        if snapshots.changed().await.is_err() {
            break;
        }
    }
    Ok(())
}

/// Forward stdin lines as commands. End of input leaves the reader.
pub fn spawn_stdin_reader(commands: mpsc::UnboundedSender<SessionCommand>) -> Result<()> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!("Failed to read stdin: {err}");
                        break;
                    }
                };
                match parse_command(&line) {
                    Ok(command) => {
                        if commands.send(command).is_err() {
                            return;
                        }
                    }
                    Err(message) => eprintln!("{message}\n{HELP}"),
                }
            }
            debug!("stdin closed");
            let _ = commands.send(SessionCommand::Back);
        })
        .context("Failed to spawn stdin reader")?;
    Ok(())
}

/// Leaving the reader ends the program.
#[derive(Debug, Default)]
pub struct TerminalNavigation;

impl Navigation for TerminalNavigation {
    fn back(&mut self) {
        info!("Closing reader");
    }
}
