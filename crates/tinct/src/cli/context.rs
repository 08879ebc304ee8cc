//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use tinct_config::Config;
use tinct_document::{Document, parse_file};
use tinct_highlight::{Highlighter, HighlighterOptions, SearchSpec};

use crate::cli::args::HighlightArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for commands like `init` that should work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Returns the configured search options with command-line overrides applied.
    ///
    /// Terms and colors given on the command line replace the configured lists wholesale.
    pub fn search_spec(&self, args: &HighlightArgs) -> SearchSpec {
        let mut spec = SearchSpec::from(&self.config.highlight);
        if !args.terms.is_empty() {
            spec.terms.clone_from(&args.terms);
        }
        if !args.colors.is_empty() {
            spec.colors.clone_from(&args.colors);
        }
        if args.case_sensitive {
            spec.case_sensitive = true;
        }
        spec
    }

    /// Builds a highlighter for `args` using the configured behavior settings.
    pub fn highlighter(&self, args: &HighlightArgs) -> Highlighter<Document> {
        Highlighter::with_options(
            self.search_spec(args),
            HighlighterOptions::from(&self.config.settings),
        )
    }

    /// Loads a document relative to the working directory.
    pub fn load_document(&self, path: &Path) -> Result<Document, ExitCode> {
        parse_file(&self.cwd.join(path)).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CommandContext {
        let mut config = Config::default();
        config.highlight.terms = vec!["configured".into()];
        config.highlight.colors = vec!["red".into(), "blue".into()];
        CommandContext {
            cwd: PathBuf::from("."),
            config,
        }
    }

    #[test]
    fn test_search_spec_without_overrides() {
        let spec = context().search_spec(&HighlightArgs::default());
        assert_eq!(spec.terms, vec!["configured"]);
        assert_eq!(spec.colors, vec!["red", "blue"]);
        assert!(!spec.case_sensitive);
    }

    #[test]
    fn test_search_spec_overrides_replace_lists() {
        let args = HighlightArgs {
            terms: vec!["a".into(), "b".into()],
            colors: Vec::new(),
            case_sensitive: true,
            selector: None,
        };
        let spec = context().search_spec(&args);
        assert_eq!(spec.terms, vec!["a", "b"]);
        assert_eq!(spec.colors, vec!["red", "blue"]);
        assert!(spec.case_sensitive);
    }
}
