//! Forge CLI - site assembly and content access.
//!
//! Provides commands for:
//! - `build`: Assemble every page with its shared fragments
//! - `resolve`: Show depth, prefix and fragment paths for a page location
//! - `content list` / `content get`: Query the content store

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ContentCommand, ResolveArgs};
use output::Output;

/// Forge - static site assembly.
#[derive(Parser)]
#[command(name = "forge", version, about)]
struct Cli {
    /// Enable verbose output (INFO level logging).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the site into the output directory.
    Build(BuildArgs),
    /// Show how a page location resolves.
    Resolve(ResolveArgs),
    /// Content store queries.
    #[command(subcommand)]
    Content(ContentCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise RUST_LOG (ERROR when unset)
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
        Commands::Content(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
