use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// JSON document holding the papers (a list, or an object keyed by paper_id)
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Field attached to every paper record with the extracted contradictions
    #[serde(default = "default_result_field")]
    pub result_field: String,

    /// File receiving debug-level logs (prompts, raw responses, errors); `null` disables it
    #[serde(default = "default_debug_log")]
    pub debug_log: Option<PathBuf>,

    #[serde(default)]
    pub summary_path: Option<PathBuf>,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub review_order: ReviewOrder,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub prompt: PromptConfig,
}

/// How collected reviews are numbered before they are sent to the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOrder {
    /// Traversal order of the input document
    #[default]
    Document,
    /// Sorted by the number in `review_<n>_full`
    Numeric,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub response_format: ResponseFormat,

    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    #[serde(default)]
    pub temperature: Option<f32>,

    /// Per-attempt timeout; unset means wait indefinitely
    #[serde(default)]
    pub timeout_sec: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key: None,
            api_key_env: default_api_key_env(),
            response_format: ResponseFormat::default(),
            agent_name: default_agent_name(),
            temperature: None,
            timeout_sec: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    JsonObject,
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseFormat::Text => write!(f, "text"),
            ResponseFormat::JsonObject => write!(f, "json_object"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt; doubled after every failure
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    #[serde(default)]
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            jitter_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PromptConfig {
    #[serde(default = "default_system_message")]
    pub system_message: String,

    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// Read the extraction instructions from this file instead of `instructions`
    #[serde(default)]
    pub instructions_file: Option<PathBuf>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_message: default_system_message(),
            instructions: default_instructions(),
            instructions_file: None,
        }
    }
}
