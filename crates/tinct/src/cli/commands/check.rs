//! Implementation of `tinct check`.

use std::process::ExitCode;

use tinct_config::{ConfigWarning, discover_config_files, is_global_config};

use crate::cli::{
    context::CommandContext,
    output::{dim, warning},
};

/// Exit codes for `tinct check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
}

/// Validates the loaded configuration and reports problems.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);

    println!("Checking configuration...");
    println!();

    if config_files.is_empty() {
        println!("No configuration files found.");
        println!();
        println!("Run 'tinct init' to create a configuration file.");
        return exit_codes::OK;
    }

    println!("Config files (highest precedence first):");
    for path in &config_files {
        if is_global_config(path) {
            println!("  {} {}", path.display(), dim("(global)"));
        } else {
            println!("  {}", path.display());
        }
    }
    println!();

    let config = &ctx.config;
    println!("Terms: {}", config.highlight.terms.len());
    println!("Colors: {}", config.highlight.colors.len());
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return exit_codes::OK;
    }

    println!("{}", warning(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("  - {w}");
    }
    println!();

    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::NoTermsDefined => {
                "Add terms = [...] under [highlight], or pass --term on the command line."
            }
            ConfigWarning::EmptyTerm { .. } => "Remove empty strings from the term list.",
            ConfigWarning::DuplicateTerm { .. } => "Remove repeated terms from the term list.",
            ConfigWarning::NoColorsDefined => "Add colors = [...] under [highlight].",
            ConfigWarning::EmptyMarkerAttribute => {
                "Set marker_attribute under [settings] to a non-empty attribute name."
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
