//! Assistant service - botany questions forwarded to a chat model.

use std::sync::Arc;

use crate::ports::{AssistantPort, ChatPrompt, CoreError};
use crate::utils::validation::{optional_text, require_text};

/// System prompt used when the caller does not supply one.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful botanist. \
     Answer questions about plant identification, invasive species removal \
     and field data collection concisely.";

pub struct AssistantService {
    assistant: Arc<dyn AssistantPort>,
}

impl AssistantService {
    pub fn new(assistant: Arc<dyn AssistantPort>) -> Self {
        Self { assistant }
    }

    pub async fn ask(
        &self,
        prompt: &str,
        system_message: Option<String>,
    ) -> Result<String, CoreError> {
        let prompt = require_text("prompt", prompt)?;
        let system_message =
            optional_text(system_message).or_else(|| Some(DEFAULT_SYSTEM_MESSAGE.to_string()));

        self.assistant
            .ask(&ChatPrompt {
                system_message,
                prompt,
            })
            .await
            .map_err(CoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoAssistant {
        seen: Mutex<Vec<ChatPrompt>>,
    }

    #[async_trait]
    impl AssistantPort for EchoAssistant {
        async fn ask(&self, prompt: &ChatPrompt) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(prompt.clone());
            Ok(format!("echo: {}", prompt.prompt))
        }
    }

    #[tokio::test]
    async fn test_ask_uses_default_system_message() {
        let port = Arc::new(EchoAssistant::default());
        let service = AssistantService::new(port.clone());

        let reply = service.ask("  What is this fern?  ", None).await.unwrap();
        assert_eq!(reply, "echo: What is this fern?");

        let seen = port.seen.lock().unwrap();
        assert_eq!(seen[0].system_message.as_deref(), Some(DEFAULT_SYSTEM_MESSAGE));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let service = AssistantService::new(Arc::new(EchoAssistant::default()));
        assert!(matches!(
            service.ask("   ", None).await,
            Err(CoreError::Validation(_))
        ));
    }
}
