use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kindcheck",
    about = "Kindcheck: declarative architectural conformance for source trees",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline over an architecture manifest
    Check {
        /// Path to the architecture manifest
        #[arg(long, default_value = "kindcheck.toml")]
        manifest: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a starter architecture manifest
    Init {
        /// Where to write the manifest
        #[arg(long, default_value = "kindcheck.toml")]
        manifest: String,

        /// Overwrite an existing manifest
        #[arg(long)]
        force: bool,
    },
}
