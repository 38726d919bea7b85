//! Kindcheck CLI: the `kindcheck` command.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { manifest, json } => commands::check::run(manifest, json),
        Commands::Init { manifest, force } => commands::init::run(manifest, force),
    }
}
