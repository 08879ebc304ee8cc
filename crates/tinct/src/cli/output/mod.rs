//! Output helpers shared by commands.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use serde::Serialize;
pub use tinct_highlight::terminal::{dim, header, warning};
use tinct_highlight::terminal::SyntaxHighlighter;

/// Returns true when stdout is an interactive terminal.
pub fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Syntax-colors `content` when writing to a terminal, returns it unchanged otherwise.
pub fn colorize(content: &str, syntax: &str) -> String {
    if stdout_is_terminal() {
        SyntaxHighlighter::new().highlight(content, syntax)
    } else {
        content.to_string()
    }
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json_str) => {
            println!("{json_str}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Indents every line of `content` by two spaces.
pub fn indent_content(content: &str) -> String {
    content
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_content() {
        assert_eq!(indent_content("a\nb"), "  a\n  b");
        assert_eq!(indent_content(""), "");
    }
}
