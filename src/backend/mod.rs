use async_openai::types::chat::{CreateChatCompletionRequest, CreateChatCompletionResponse};
use async_trait::async_trait;

use crate::error::CompletionError;

#[cfg(feature = "backend-azure")]
pub mod azure;

pub mod scripted;

/// A chat-completion capability: one request in, one response out.
#[async_trait]
pub trait ChatCompletionBackend: Send + Sync {
    async fn chat_completion(
        &self,
        req: CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse, CompletionError>;
}

