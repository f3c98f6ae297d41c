//! CLI argument parsing and command implementations.

pub mod commands;
pub mod parser;

pub use parser::{Cli, Commands};

use crate::Result;

/// Dispatch a parsed invocation.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Compose(args) => commands::compose::run(args),
        Commands::Reconcile(args) => commands::reconcile::run(args),
        Commands::Split(args) => commands::split::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Bootstrap(args) => commands::bootstrap::run(args),
    }
}
