//! Chat backend seam and the OpenAI-compatible implementation.

use crate::config::AgentConfig;
use crate::error::AgentError;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// Sampling temperature used by the backing chat model.
const CHAT_TEMPERATURE: f32 = 0.8;

/// Message role sent to the chat backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

/// One message in a chat-completion request.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Ordered, finite stream of output text chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, AgentError>> + Send>>;

/// Remote chat-completion backend.
///
/// The actual provider call is an external collaborator; this trait is the
/// seam agents talk to, and what tests replace with scripted chunks.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Stream the completion for the given messages, one text chunk at a time.
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChunkStream, AgentError>;
}

/// Streaming client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatModel {
    /// Build a client from the agent configuration.
    pub fn new(config: &AgentConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.api_base_url)
            .with_api_key(&config.api_key);

        Self {
            client: Client::with_config(openai_config),
            model: config.model_name.clone(),
        }
    }

    fn build_request_messages(
        messages: &[ChatMessage],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        messages
            .iter()
            .map(|msg| match msg.role {
                Role::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content.as_str())
                    .build()
                    .map(ChatCompletionRequestMessage::System)
                    .map_err(|e| AgentError::ChatBackend(e.to_string())),
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content.as_str())
                    .build()
                    .map(ChatCompletionRequestMessage::User)
                    .map_err(|e| AgentError::ChatBackend(e.to_string())),
            })
            .collect()
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChunkStream, AgentError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::build_request_messages(&messages)?)
            .temperature(CHAT_TEMPERATURE)
            .build()
            .map_err(|e| AgentError::ChatBackend(e.to_string()))?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| AgentError::ChatBackend(e.to_string()))?;

        // Keep only non-empty content deltas; other stream events carry no text.
        let chunks = stream.filter_map(|item| async move {
            match item {
                Ok(response) => response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .filter(|content| !content.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(AgentError::ChatBackend(e.to_string()))),
            }
        });

        Ok(Box::pin(chunks))
    }
}
