//! Plain-text presentation: snapshot rendering and shell input parsing.

use std::fmt::Write as _;

use taskwin_proto::{TaskId, WINDOW_SIZE};

use crate::engine::{ClientState, Intent};

/// Help text for the interactive shell.
pub const SHELL_HELP: &str = "\
commands:
  add <title> [| <description>]   create a task
  done <id>                       mark a task done
  refresh                         reload the window
  help                            show this text
  quit                            leave
";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Intents to apply in order; empty for a blank line.
    Intents(Vec<Intent>),
    /// Print [`SHELL_HELP`].
    Help,
    /// Leave the shell.
    Quit,
}

/// Render a snapshot as terminal text.
///
/// Pure: the same snapshot always yields the same output.
#[must_use]
pub fn render(state: &ClientState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Active Tasks (Latest {} of {WINDOW_SIZE})",
        state.tasks.len()
    );

    if state.tasks.is_empty() {
        out.push_str("  No tasks found! Start by adding a new task.\n");
    }
    for task in &state.tasks {
        if task.description.is_empty() {
            let _ = writeln!(out, "  [{}] {}", task.id, task.title);
        } else {
            let _ = writeln!(out, "  [{}] {} \u{2014} {}", task.id, task.title, task.description);
        }
    }

    if state.pending_operation {
        out.push_str("Processing...\n");
    }
    if let Some(error) = &state.last_error {
        let _ = writeln!(out, "Error: {error}");
    }
    out
}

/// Parse one line of shell input.
///
/// # Errors
///
/// Returns a short usage message for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match word {
        "" => Ok(ShellCommand::Intents(Vec::new())),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        "refresh" | "r" => Ok(ShellCommand::Intents(vec![Intent::Refresh])),
        "add" | "a" => {
            // The title is not validated here; the engine owns that decision.
            let (title, description) = rest.split_once('|').unwrap_or((rest, ""));
            Ok(ShellCommand::Intents(vec![Intent::CreateFrom {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
            }]))
        }
        "done" | "d" => rest
            .parse::<TaskId>()
            .map(|id| ShellCommand::Intents(vec![Intent::Complete(id)]))
            .map_err(|_| format!("usage: done <id> (got {rest:?})")),
        other => Err(format!("unknown command {other:?}; type `help`")),
    }
}
