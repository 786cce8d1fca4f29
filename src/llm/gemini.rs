//! Gemini generation through its OpenAI-compatible endpoint.

use super::Generator;
use crate::config::RagSettings;
use crate::error::{FolioError, Result};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Generator backed by a Gemini model (Gemma by default).
pub struct GeminiGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, settings: &RagSettings) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FolioError::Generation(
                "API key must not be empty".to_string(),
            ));
        }

        let client = create_client(
            &settings.api_base,
            api_key,
            Duration::from_secs(settings.timeout_secs),
        )?;

        Ok(Self {
            client,
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        // Gemma models reject system messages, so the whole prompt goes in one user turn.
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| FolioError::Generation(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| FolioError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| FolioError::Generation(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| FolioError::Generation("Empty response from model".to_string()))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_configured_model() {
        let generator = GeminiGenerator::new("key", &RagSettings::default()).unwrap();
        assert_eq!(generator.model(), "gemma-3-1b-it");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(GeminiGenerator::new("", &RagSettings::default()).is_err());
    }
}
