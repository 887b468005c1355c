mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            ref flow,
            ref input,
            ref input_file,
            ref output,
        } => {
            commands::run::execute(
                &cli,
                flow,
                input.as_deref(),
                input_file.as_deref(),
                output,
            )
            .await
        }
        Commands::List => commands::list::execute(),
    }
}
