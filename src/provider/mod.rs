mod chat;

pub use chat::ChatAgent;

use crate::config::Config;
use crate::error::ProviderError;
use async_trait::async_trait;
use std::sync::Arc;

pub const USER_SOURCE: &str = "user";

/// One message of an agent run, tagged with who produced it
#[derive(Debug, Clone, PartialEq)]
pub struct AgentMessage {
    pub source: String,
    pub content: String,
}

/// Full result of a single agent task: the task itself followed by the agent's replies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentResponse {
    pub messages: Vec<AgentMessage>,
}

impl AgentResponse {
    /// Content of the first message produced by `source`
    pub fn message_from(&self, source: &str) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.source == source)
            .map(|m| m.content.as_str())
    }

    /// Text of every non-user message, joined by newlines
    pub fn text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.source != USER_SOURCE)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for AgentResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, message) in self.messages.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", message.source, message.content)?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// Run one chat task to completion
    async fn run(&self, task: &str) -> Result<AgentResponse, ProviderError>;
}

/// Build the extractor agent described by the provider config
pub fn create_agent(config: &Config, api_key: String) -> Result<Arc<dyn Agent>, ProviderError> {
    let agent = ChatAgent::new(
        &config.provider,
        api_key,
        config.prompt.system_message.clone(),
    )?;
    Ok(Arc::new(agent))
}
