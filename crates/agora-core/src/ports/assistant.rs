//! Botany assistant port (chat completion).

use async_trait::async_trait;

use super::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system_message: Option<String>,
    pub prompt: String,
}

/// Port for a chat-completion model. The implementation lives in `agora-clients`.
#[async_trait]
pub trait AssistantPort: Send + Sync {
    /// Return the model's reply text.
    async fn ask(&self, prompt: &ChatPrompt) -> Result<String, ProviderError>;
}
