//! Terminal output: syntax-colored source, styled status text and painted fragments.

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

use crate::Fragment;

/// Syntax-colors source text (TOML, HTML) for terminal output.
pub struct SyntaxHighlighter {
    /// Language definitions, including TOML from two-face.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Active theme.
    theme: EmbeddedThemeName,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Colors TOML.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Colors HTML.
    pub fn highlight_html(&self, content: &str) -> String {
        self.highlight(content, "html")
    }

    /// Colors `content` as the syntax named by extension or name.
    ///
    /// Unknown syntaxes fall back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut lines = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI escape codes.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow text (for warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reverse video, used when a color has no terminal equivalent.
    pub const REVERSE: &str = "\x1b[7m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Maps a CSS color to an ANSI background escape.
///
/// Basic named colors map to the 8-color palette; `#rgb` and `#rrggbb` map to 24-bit color.
/// Anything else returns `None`.
pub fn ansi_background(color: &str) -> Option<String> {
    let color = color.trim().to_ascii_lowercase();
    let code = match color.as_str() {
        "black" => 40,
        "red" | "maroon" => 41,
        "green" | "lime" => 42,
        "yellow" | "gold" | "orange" => 43,
        "blue" | "navy" => 44,
        "magenta" | "fuchsia" | "purple" | "pink" => 45,
        "cyan" | "aqua" | "teal" => 46,
        "white" | "silver" | "gray" | "grey" => 47,
        _ => {
            let (r, g, b) = parse_hex(&color)?;
            return Some(format!("\x1b[48;2;{r};{g};{b}m"));
        }
    };
    Some(format!("\x1b[{code}m"))
}

/// Parses `#rgb` or `#rrggbb`.
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_string().repeat(2));
            Some((
                channel(&digits.next()?)?,
                channel(&digits.next()?)?,
                channel(&digits.next()?)?,
            ))
        }
        6 => Some((
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Renders fragments for a terminal, painting highlighted runs with their background.
pub fn paint_fragments(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Plain { text } => out.push_str(text),
            Fragment::Highlighted { text, color } => {
                let start = ansi_background(color).unwrap_or_else(|| colors::REVERSE.to_string());
                out.push_str(&start);
                out.push_str(text);
                out.push_str(colors::RESET);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_toml() {
        let hl = SyntaxHighlighter::new();
        let output = hl.highlight_toml("[highlight]\nterms = [\"a\"]\n");
        assert!(output.contains("\x1b["));
        assert!(output.ends_with(colors::RESET));
    }

    #[test]
    fn test_highlight_html() {
        let hl = SyntaxHighlighter::new();
        let output = hl.highlight_html("<p>hi</p>\n");
        assert!(output.contains("\x1b["));
        assert!(output.contains("hi"));
    }

    #[test]
    fn test_status_formatting() {
        let h = header("Test");
        assert!(h.starts_with(colors::BOLD));
        assert!(h.contains(colors::CYAN));
        assert!(h.ends_with(colors::RESET));
        assert!(dim("x").contains(colors::DIM));
        assert!(warning("x").contains(colors::YELLOW));
    }

    #[test]
    fn test_ansi_background() {
        assert_eq!(ansi_background("Yellow").as_deref(), Some("\x1b[43m"));
        assert_eq!(
            ansi_background("#ff8000").as_deref(),
            Some("\x1b[48;2;255;128;0m")
        );
        assert_eq!(
            ansi_background("#0f0").as_deref(),
            Some("\x1b[48;2;0;255;0m")
        );
        assert!(ansi_background("rgb(1, 2, 3)").is_none());
        assert!(ansi_background("#12345").is_none());
        assert!(ansi_background("#ggg").is_none());
    }

    #[test]
    fn test_paint_fragments() {
        let fragments = vec![
            Fragment::Plain { text: "a ".into() },
            Fragment::Highlighted {
                text: "b".into(),
                color: "red".into(),
            },
            Fragment::Highlighted {
                text: "c".into(),
                color: "hsl(0, 0%, 0%)".into(),
            },
        ];
        assert_eq!(
            paint_fragments(&fragments),
            "a \x1b[41mb\x1b[0m\x1b[7mc\x1b[0m"
        );
    }
}
