use super::{Agent, AgentMessage, AgentResponse, USER_SOURCE};
use crate::config::{ProviderConfig, ResponseFormat};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Agent backed by an OpenAI-compatible `/chat/completions` endpoint
pub struct ChatAgent {
    name: String,
    model: String,
    endpoint: String,
    api_key: String,
    system_message: String,
    response_format: ResponseFormat,
    temperature: Option<f32>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatAgent {
    pub fn new(
        config: &ProviderConfig,
        api_key: String,
        system_message: String,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            name: config.agent_name.clone(),
            model: config.model.clone(),
            endpoint: chat_endpoint(&config.api_base),
            api_key,
            system_message,
            response_format: config.response_format,
            temperature: config.temperature,
            client,
        })
    }

    fn request<'a>(&'a self, task: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !self.system_message.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &self.system_message,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: task,
        });

        ChatRequest {
            model: &self.model,
            messages,
            response_format: match self.response_format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => Some(ResponseFormatSpec {
                    kind: "json_object",
                }),
            },
            temperature: self.temperature,
        }
    }
}

fn chat_endpoint(api_base: &str) -> String {
    format!("{}/chat/completions", api_base.trim_end_matches('/'))
}

#[async_trait]
impl Agent for ChatAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, task: &str) -> Result<AgentResponse, ProviderError> {
        debug!("Calling {} ({}) at {}", self.name, self.model, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(task))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        let replies: Vec<AgentMessage> = completion
            .choices
            .into_iter()
            .map(|choice| AgentMessage {
                source: self.name.clone(),
                content: choice.message.content.unwrap_or_default(),
            })
            .collect();

        if replies.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        let mut messages = Vec::with_capacity(replies.len() + 1);
        messages.push(AgentMessage {
            source: USER_SOURCE.to_string(),
            content: task.to_string(),
        });
        messages.extend(replies);

        Ok(AgentResponse { messages })
    }
}
