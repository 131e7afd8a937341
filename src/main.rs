mod classify;
mod cli;
mod commands;
mod config;
mod error;
mod files;
mod mcp;
mod page_spec;
mod pdf;
mod result;
mod selection;
mod trim;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use selection::{Bounds, SelectionMode};
use tracing_subscriber::EnvFilter;
use trim::{Target, TrimRequest};

fn init_tracing(debug: bool) {
    // stdout carries results (and the MCP transport), so logs go to stderr
    let filter = if debug {
        EnvFilter::new("pdftrim=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn mode(keep: bool) -> SelectionMode {
    if keep {
        SelectionMode::Keep
    } else {
        SelectionMode::Delete
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Search { text, keep, target } => {
            let request = TrimRequest::new(Target::Search(text), mode(keep));
            commands::trim::run(request, &target)?;
        }
        Commands::Delete { pages, target } => {
            let request = TrimRequest::new(Target::Pages(pages), SelectionMode::Delete);
            commands::trim::run(request, &target)?;
        }
        Commands::Keep { pages, target } => {
            let request = TrimRequest::new(Target::Pages(pages), SelectionMode::Keep);
            commands::trim::run(request, &target)?;
        }
        Commands::Bounds {
            before,
            after,
            keep,
            target,
        } => {
            let request = TrimRequest::new(Target::Bounds(Bounds { before, after }), mode(keep));
            commands::trim::run(request, &target)?;
        }
        Commands::Blanks { path, json } => {
            commands::blanks::run(&path, json)?;
        }
    }

    Ok(())
}
