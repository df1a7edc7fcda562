//! nbpages CLI - notebook to static site pages.
//!
//! Provides commands for:
//! - `build`: Render notebooks to markdown pages and rebuild the navigation file
//! - `nav`: Rebuild the navigation file from already rendered pages

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, NavArgs};
use output::Output;

/// nbpages - publish Jupyter notebooks as static site pages.
#[derive(Parser)]
#[command(name = "nbpages", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render notebooks to markdown and rebuild the navigation file.
    Build(BuildArgs),
    /// Rebuild the navigation file from rendered pages.
    Nav(NavArgs),
}

impl Commands {
    fn debug(&self) -> bool {
        match self {
            Self::Build(args) => args.pages.debug,
            Self::Nav(args) => args.pages.debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --debug forces DEBUG, otherwise RUST_LOG or INFO
    let filter = if cli.command.debug() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(&output),
        Commands::Nav(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
