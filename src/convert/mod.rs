use async_openai::types::chat::{
    ChatChoice, ChatCompletionResponseMessage, CreateChatCompletionResponse, FinishReason, Role,
};
use uuid::Uuid;

pub fn generate_chat_cmpl_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4().as_simple())
}

pub fn unix_timestamp() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as u32
}

/// Builds a completion response with one assistant choice per entry of `texts`.
#[allow(deprecated)]
pub fn assistant_response<I, S>(model: &str, texts: I) -> CreateChatCompletionResponse
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let choices = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| ChatChoice {
            index: i as u32,
            message: ChatCompletionResponseMessage {
                content: Some(text.into()),
                tool_calls: None,
                role: Role::Assistant,
                function_call: None,
                refusal: None,
                audio: None,
                annotations: None,
            },
            finish_reason: Some(FinishReason::Stop),
            logprobs: None,
        })
        .collect();

    CreateChatCompletionResponse {
        id: generate_chat_cmpl_id(),
        object: "chat.completion".to_string(),
        created: unix_timestamp(),
        model: model.to_string(),
        choices,
        usage: None,
        system_fingerprint: None,
        service_tier: None,
    }
}
