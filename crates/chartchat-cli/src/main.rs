mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::LoginUrl(args) => commands::auth::login_url(args),
        Commands::Exchange(args) => commands::auth::exchange(args).await,
        Commands::Whoami(args) => commands::auth::whoami(args).await,
        Commands::Get(args) => commands::query::get(args).await,
        Commands::Search(args) => commands::query::search(args).await,
        Commands::Appointments(args) => commands::query::appointments(args).await,
        Commands::Tools(args) => commands::query::tools(args),
        Commands::PullDocs(args) => commands::pull::pull_docs(args).await,
    }
}
