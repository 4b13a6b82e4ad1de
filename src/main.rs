use clap::Parser;

mod cli;
mod config;
mod discovery;
mod document;
mod error;
mod logging;
mod output;
mod parser;
mod provider;
mod runner;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, verbose).await,
        Commands::Schema => cli::schema::execute(),
    }
}
