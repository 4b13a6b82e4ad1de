pub mod run;
pub mod schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reviewclash")]
#[command(
    author,
    version,
    about = "Extract contradictions between peer reviews with a chat model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract contradictions for every paper and write the augmented document
    Run(RunArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to config file [default: reviewclash.yaml, built-in defaults if absent]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the input document
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Override the output document
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Override the number of papers processed in parallel
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// API key for the chat provider
    #[arg(long, env = "REVIEWCLASH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Show plan without calling the model
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,
}
