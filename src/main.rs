//! apilinks CLI
//!
//! Turns inline API-call references in markdown docs into links to the
//! matching sections of published API references.

use anyhow::Result;
use apilinks::anchors::{run_anchors, AnchorsArgs};
use apilinks::init::{run_init, InitArgs};
use apilinks::link::{run_link, LinkArgs};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apilinks")]
#[command(version)]
#[command(about = "Link API references in docs to published API documentation")]
#[command(long_about = "Finds references like `GET /users/{id}` in markdown and rewrites them into links to the matching heading of an API reference page.\n\nCommands:\n  link      Rewrite references in markdown files\n  anchors   Show the h2 anchors of API reference pages\n  init      Create apilinks.yaml template")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite API references in markdown files
    Link(LinkArgs),
    /// Show the h2 anchors harvested from API reference pages
    Anchors(AnchorsArgs),
    /// Create apilinks.yaml template
    Init(InitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apilinks=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Link(args) => run_link(args).await,
        Commands::Anchors(args) => run_anchors(args).await,
        Commands::Init(args) => run_init(args).await,
    }
}
