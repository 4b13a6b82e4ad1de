use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to read prompt file '{path}': {source}")]
    ReadPrompt {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read input file '{path}': {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse input file '{path}': {source}")]
    ParseInput {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Input document must be a list of papers or an object keyed by paper_id, found {0}")]
    InvalidShape(&'static str),

    #[error("Failed to write output file '{path}': {source}")]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model returned no choices")]
    EmptyResponse,

    #[error("No API key configured (set provider.api_key, ${env_var}, or --api-key)")]
    MissingApiKey { env_var: String },
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to acquire semaphore: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),
}

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No JSON array found in response")]
    NoJsonArray,

    #[error("Response JSON is {0}, expected a list of contradictions")]
    UnexpectedShape(&'static str),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write summary: {0}")]
    WriteSummary(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
