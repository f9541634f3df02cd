//! relbin - install versioned release binaries

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

use relbin_cli::cmd;
use relbin_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for paths and versions.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let installer = relbin_cli::installer(&cli)?;

    match cli.command {
        Commands::Install {
            repo,
            version,
            force,
        } => cmd::install::install(&installer, &repo, version, force).await,
        Commands::Latest { repo } => cmd::latest::latest(&installer, &repo).await,
        Commands::List { repo } => cmd::list::list(&installer, &repo),
        Commands::Path { repo, version } => cmd::path::path(&installer, &repo, &version),
        Commands::Remove { repo, version } => cmd::remove::remove(&installer, &repo, &version),
    }
}

fn report(err: &anyhow::Error) {
    let mut shown = err.to_string();
    eprintln!("{} {shown}", "error:".red().bold());
    // Library errors already embed their source in the message.
    for cause in err.chain().skip(1) {
        let msg = cause.to_string();
        if !shown.contains(&msg) {
            eprintln!("  {} {msg}", "caused by:".dark_grey());
        }
        shown = msg;
    }
    if let Some(hint) = relbin_cli::remediation(err) {
        eprintln!("  {} {hint}", "hint:".dark_grey());
    }
}
