//! Plain-text rendering of controller state for the terminal.

use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};

use crate::core::domain::{GenerationStatus, HistoryEntry};

pub const BANNER: &str = "Green Screen VFX Prompt Generator";

pub const HELP_TEXT: &str = "\
Type a short description (any language) and press Enter to generate a prompt.
Start a description with // to submit text that begins with /.
Commands:
  /copy        copy the current prompt to the clipboard
  /copy <n>    copy history entry n (1 = most recent)
  /history     show the session history
  /clear       clear the session history
  /help        show this help
  /quit        leave the session";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    /// Blank line; the submit action is disabled for it.
    Empty,
    Submit(String),
    Copy(Option<usize>),
    History,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

impl ViewCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ViewCommand::Empty;
        }
        let Some(command) = trimmed.strip_prefix('/') else {
            return ViewCommand::Submit(line.trim_end_matches(['\r', '\n']).to_string());
        };
        if command.starts_with('/') {
            return ViewCommand::Submit(command.trim_end().to_string());
        }

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("copy"), None, None) => ViewCommand::Copy(None),
            (Some("copy"), Some(n), None) => match n.parse::<usize>() {
                Ok(index) if index > 0 => ViewCommand::Copy(Some(index)),
                _ => ViewCommand::Unknown(trimmed.to_string()),
            },
            (Some("history"), None, None) => ViewCommand::History,
            (Some("clear"), None, None) => ViewCommand::Clear,
            (Some("help"), None, None) => ViewCommand::Help,
            (Some("quit" | "exit"), None, None) => ViewCommand::Quit,
            _ => ViewCommand::Unknown(trimmed.to_string()),
        }
    }
}

/// Local wall-clock time (`HH:MM:SS`) for a unix timestamp in milliseconds.
pub fn format_time(created_at_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(created_at_ms)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

pub fn render_status<W: Write>(out: &mut W, status: &GenerationStatus) -> io::Result<()> {
    match status {
        GenerationStatus::Idle => Ok(()),
        GenerationStatus::Generating => writeln!(out, "Generating prompt..."),
        GenerationStatus::Error { message } => {
            writeln!(out, "Error")?;
            writeln!(out, "  {message}")
        }
        GenerationStatus::Completed { prompt } => {
            writeln!(out, "=== PROMPT OUTPUT ===")?;
            writeln!(out, "{prompt}")?;
            writeln!(out, "=====================")
        }
    }
}

pub fn render_history<W: Write>(out: &mut W, entries: &[HistoryEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "History is empty.");
    }
    writeln!(out, "History ({})", entries.len())?;
    for (idx, entry) in entries.iter().enumerate() {
        writeln!(out, "[{}] {}", idx + 1, format_time(entry.created_at_ms()))?;
        writeln!(out, "    Input:  {}", entry.original_input())?;
        writeln!(out, "    Prompt: {}", entry.produced_prompt())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parses_commands_and_free_text() {
        assert_eq!(ViewCommand::parse("   "), ViewCommand::Empty);
        assert_eq!(
            ViewCommand::parse("一只燃烧的火凤凰"),
            ViewCommand::Submit("一只燃烧的火凤凰".into())
        );
        assert_eq!(ViewCommand::parse("/copy"), ViewCommand::Copy(None));
        assert_eq!(ViewCommand::parse(" /copy 2 "), ViewCommand::Copy(Some(2)));
        assert_eq!(ViewCommand::parse("/history"), ViewCommand::History);
        assert_eq!(ViewCommand::parse("/exit"), ViewCommand::Quit);
        assert!(matches!(ViewCommand::parse("/copy 0"), ViewCommand::Unknown(_)));
        assert!(matches!(ViewCommand::parse("/nope"), ViewCommand::Unknown(_)));
    }

    #[test]
    fn double_slash_submits_literal_text() {
        assert_eq!(
            ViewCommand::parse("//r/cyberpunk neon sign"),
            ViewCommand::Submit("/r/cyberpunk neon sign".into())
        );
        assert_eq!(
            ViewCommand::parse("  ///etc  "),
            ViewCommand::Submit("//etc".into())
        );
        assert!(matches!(ViewCommand::parse("/r/cyberpunk"), ViewCommand::Unknown(_)));
    }

    #[test]
    fn idle_renders_nothing() {
        assert!(rendered(|out| render_status(out, &GenerationStatus::Idle)).is_empty());
    }

    #[test]
    fn renders_error_panel_and_result_panel() {
        let error = rendered(|out| render_status(out, &GenerationStatus::error("boom")));
        assert!(error.starts_with("Error"));
        assert!(error.contains("boom"));

        let result = rendered(|out| {
            render_status(
                out,
                &GenerationStatus::Completed {
                    prompt: "Full shot".into(),
                },
            )
        });
        assert!(result.contains("PROMPT OUTPUT"));
        assert!(result.contains("Full shot"));
    }

    #[test]
    fn history_lists_entries_in_given_order() {
        let entries = vec![
            HistoryEntry::new("b", 2_000, "second", "p2"),
            HistoryEntry::new("a", 1_000, "first", "p1"),
        ];
        let text = rendered(|out| render_history(out, &entries));
        let second = text.find("second").unwrap();
        let first = text.find("first").unwrap();
        assert!(second < first);
        assert!(text.starts_with("History (2)"));
    }

    #[test]
    fn format_time_is_clock_shaped() {
        let formatted = format_time(0);
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.matches(':').count(), 2);
    }
}
