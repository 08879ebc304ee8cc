//! Clap argument definitions for the `tinct` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "tinct")]
#[command(about = "Highlight literal terms in markdown and text documents")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override the configured search options.
#[derive(Args, Debug, Clone, Default)]
pub struct HighlightArgs {
    /// Term to highlight (repeatable; replaces configured terms)
    #[arg(short = 't', long = "term")]
    pub terms: Vec<String>,

    /// Background color (repeatable; replaces configured colors)
    #[arg(short = 'c', long = "color")]
    pub colors: Vec<String>,

    /// Match case exactly
    #[arg(long)]
    pub case_sensitive: bool,

    /// Highlight only the first element matching this CSS selector [default: whole document]
    #[arg(short = 's', long)]
    pub selector: Option<String>,
}

/// Arguments for `tinct render`.
#[derive(Args, Debug, Clone)]
pub struct RenderCommand {
    /// Markdown (.md, .markdown) or text (.txt) file
    pub file: PathBuf,

    /// Search options.
    #[command(flatten)]
    pub highlight: HighlightArgs,

    /// Append this file's content under the highlighted element afterwards (repeatable)
    #[arg(short = 'a', long = "append")]
    pub append: Vec<PathBuf>,

    /// Print only the children of the document body
    #[arg(long)]
    pub inner: bool,
}

/// Arguments for `tinct spans`.
#[derive(Args, Debug, Clone)]
pub struct SpansCommand {
    /// Markdown (.md, .markdown) or text (.txt) file
    pub file: PathBuf,

    /// Search options.
    #[command(flatten)]
    pub highlight: HighlightArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `tinct init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.tinct.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `tinct` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Highlight a document and print it as HTML
    #[command(after_help = "\
EXAMPLES:
  tinct render notes.md -t rust -t cargo
  tinct render notes.md -t todo -c '#fc0' -s 'ul > li'
  tinct render notes.md -t rust -a more.md")]
    Render(RenderCommand),

    /// Show which text would be highlighted, per text node
    Spans(SpansCommand),

    /// Initialize tinct configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Check,
}
