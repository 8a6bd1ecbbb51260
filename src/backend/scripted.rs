use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_openai::types::chat::{CreateChatCompletionRequest, CreateChatCompletionResponse};
use async_trait::async_trait;

use super::ChatCompletionBackend;
use crate::convert::assistant_response;
use crate::error::CompletionError;

/// A backend that replays scripted results and records every request.
///
/// Useful for exercising callers without network access. Results are
/// returned in the order they were pushed; calling past the end of the
/// script is a [`CompletionError::ProtocolViolation`].
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<CreateChatCompletionResponse, CompletionError>>>,
    requests: Mutex<Vec<CreateChatCompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: CreateChatCompletionResponse) -> &Self {
        lock(&self.script).push_back(Ok(response));
        self
    }

    /// Queues a response with one assistant choice per entry of `texts`.
    pub fn push_text<I, S>(&self, model: &str, texts: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_response(assistant_response(model, texts))
    }

    pub fn push_error(&self, error: CompletionError) -> &Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CreateChatCompletionRequest> {
        lock(&self.requests).clone()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ChatCompletionBackend for ScriptedBackend {
    async fn chat_completion(
        &self,
        req: CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse, CompletionError> {
        lock(&self.requests).push(req);
        lock(&self.script).pop_front().unwrap_or_else(|| {
            Err(CompletionError::ProtocolViolation(
                "scripted backend has no response left".to_string(),
            ))
        })
    }
}
