//! OpenAI-compatible chat completions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use agora_core::ports::{AssistantPort, ChatPrompt, ProviderError};

use crate::config::OpenAiConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, Retry, join_url};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn chat_request<'a>(model: &'a str, prompt: &'a ChatPrompt) -> ChatRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = prompt.system_message.as_deref() {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: &prompt.prompt,
    });
    ChatRequest { model, messages }
}

fn reply_text(response: ChatResponse) -> ClientResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| ClientError::invalid("completion has no choices"))
}

pub struct OpenAiClient {
    http: HttpClient,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(http: HttpClient, config: &OpenAiConfig) -> Self {
        Self {
            http,
            endpoint: join_url(&config.base_url, "chat/completions"),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl AssistantPort for OpenAiClient {
    async fn ask(&self, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        let body = chat_request(&self.model, prompt);
        let response: ChatResponse = self
            .http
            .send_json(Retry::Transient, |client| {
                Ok(client
                    .post(&self.endpoint)
                    .bearer_auth(&self.api_key)
                    .json(&body))
            })
            .await?;
        Ok(reply_text(response)?)
    }
}
