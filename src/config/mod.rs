mod defaults;
mod types;

pub use types::*;

use crate::error::{ConfigError, ProviderError};
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            input: default_input(),
            output: default_output(),
            result_field: default_result_field(),
            debug_log: default_debug_log(),
            summary_path: None,
            concurrency: default_concurrency(),
            review_order: ReviewOrder::default(),
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
            prompt: PromptConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.provider.timeout_sec == Some(0) {
            return Err(ConfigError::Invalid(
                "provider.timeout_sec must be at least 1".to_string(),
            ));
        }
        if self.result_field.trim().is_empty() {
            return Err(ConfigError::Invalid("result_field is empty".to_string()));
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.model is empty".to_string()));
        }
        Ok(())
    }

    /// Extraction instructions, read from `prompt.instructions_file` when set
    pub fn instructions(&self) -> Result<String, ConfigError> {
        match &self.prompt.instructions_file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| ConfigError::ReadPrompt {
                path: path.clone(),
                source: e,
            }),
            None => Ok(self.prompt.instructions.clone()),
        }
    }

    /// Resolve the API credential: explicit override, then config, then environment
    pub fn resolve_api_key(&self, cli_override: Option<&str>) -> Result<String, ProviderError> {
        let key = cli_override
            .map(str::to_string)
            .or_else(|| self.provider.api_key.clone())
            .or_else(|| std::env::var(&self.provider.api_key_env).ok())
            .filter(|k| !k.trim().is_empty());

        key.ok_or_else(|| ProviderError::MissingApiKey {
            env_var: self.provider.api_key_env.clone(),
        })
    }
}
