//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod init;
pub mod render;
mod shared;
pub mod spans;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Render(cmd) => render::run(ctx, &cmd),
        Commands::Spans(cmd) => spans::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
        Commands::Check => check::run(ctx),
    }
}
