//! One-shot chat completion returning the first choice's text.

use async_openai::types::chat::{CreateChatCompletionRequest, CreateChatCompletionResponse};
use serde_json::Value;
use tracing::debug;

use crate::backend::ChatCompletionBackend;
use crate::error::{CompletionError, Result};

/// Sends `request` to `model_name` through `backend` and returns the text
/// of the first choice.
///
/// `request.model` is overwritten with `model_name`. Exactly one request is
/// issued; upstream errors are returned as-is.
pub async fn invoke<B>(
    model_name: &str,
    backend: &B,
    mut request: CreateChatCompletionRequest,
) -> Result<String>
where
    B: ChatCompletionBackend + ?Sized,
{
    debug!(model = %model_name, "{model_name} is running");

    request.model = model_name.to_string();
    let response = backend.chat_completion(request).await?;
    first_choice_text(response)
}

/// Like [`invoke`], for a request given as a JSON object of chat-completion
/// parameters (`messages`, `temperature`, `max_tokens`, ...).
pub async fn invoke_value<B>(model_name: &str, backend: &B, payload: Value) -> Result<String>
where
    B: ChatCompletionBackend + ?Sized,
{
    let request = request_from_value(model_name, payload)?;
    invoke(model_name, backend, request).await
}

/// Blocking form of [`invoke`]. Drives the request on a current-thread
/// runtime.
///
/// Called from inside a tokio runtime it returns
/// [`CompletionError::NestedRuntime`] without issuing a request.
pub fn invoke_blocking<B>(
    model_name: &str,
    backend: &B,
    request: CreateChatCompletionRequest,
) -> Result<String>
where
    B: ChatCompletionBackend + ?Sized,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(CompletionError::NestedRuntime);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CompletionError::Runtime)?;

    runtime.block_on(invoke(model_name, backend, request))
}

/// Merges `model_name` into a JSON parameter object and decodes it.
pub fn request_from_value(model_name: &str, payload: Value) -> Result<CreateChatCompletionRequest> {
    let Value::Object(mut params) = payload else {
        return Err(CompletionError::InvalidRequest(format!(
            "request payload must be a JSON object, got {payload}"
        )));
    };

    params.insert("model".to_string(), Value::String(model_name.to_string()));
    Ok(serde_json::from_value(Value::Object(params))?)
}

/// Extracts the message content of choice 0.
pub fn first_choice_text(response: CreateChatCompletionResponse) -> Result<String> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        CompletionError::ProtocolViolation("response contained no choices".to_string())
    })?;

    choice.message.content.ok_or_else(|| {
        CompletionError::ProtocolViolation("first choice has no message content".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::scripted::ScriptedBackend;
    use crate::convert::assistant_response;
    use async_openai::types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    };
    use serde_json::json;
    use tracing_test::traced_test;

    fn user_messages(prompt: &str) -> Vec<ChatCompletionRequestMessage> {
        vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .unwrap(),
        )]
    }

    #[tokio::test]
    async fn test_invoke_sets_model_and_returns_first_choice() {
        let backend = ScriptedBackend::new();
        backend.push_text("gpt-x", ["first", "second"]);

        let request = CreateChatCompletionRequest {
            model: "ignored".to_string(),
            messages: user_messages("hello"),
            ..Default::default()
        };

        let text = invoke("gpt-x", &backend, request).await.unwrap();
        assert_eq!(text, "first");

        let sent = backend.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].model, "gpt-x");
        let messages = serde_json::to_value(&sent[0].messages).unwrap();
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "hello");
    }

    #[tokio::test]
    async fn test_invoke_empty_choices_is_protocol_violation() {
        let backend = ScriptedBackend::new();
        backend.push_response(assistant_response::<_, String>("gpt-x", []));

        let err = invoke("gpt-x", &backend, CreateChatCompletionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::ProtocolViolation(_)));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invoke_missing_content_is_protocol_violation() {
        let mut response = assistant_response("gpt-x", ["x"]);
        response.choices[0].message.content = None;
        let backend = ScriptedBackend::new();
        backend.push_response(response);

        let err = invoke("gpt-x", &backend, CreateChatCompletionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::ProtocolViolation(_)));
    }

    #[cfg(feature = "backend-azure")]
    #[tokio::test]
    async fn test_invoke_propagates_upstream_error() {
        use async_openai::error::OpenAIError;

        let backend = ScriptedBackend::new();
        backend.push_error(OpenAIError::InvalidArgument("quota exceeded".to_string()).into());

        let err = invoke("gpt-x", &backend, CreateChatCompletionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CompletionError::OpenAI(OpenAIError::InvalidArgument(ref m)) if m == "quota exceeded"
        ));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invoke_value_injects_model() {
        let backend = ScriptedBackend::new();
        backend.push_text("gpt-x", ["hi there"]);

        let payload = json!({
            "model": "caller-supplied",
            "messages": [{"role": "user", "content": "hello"}],
            "temperature": 0.5,
            "max_tokens": 64
        });

        let text = invoke_value("gpt-x", &backend, payload).await.unwrap();
        assert_eq!(text, "hi there");

        let sent = &backend.requests()[0];
        assert_eq!(sent.model, "gpt-x");
        assert_eq!(sent.messages.len(), 1);
        assert_eq!(sent.temperature, Some(0.5));
    }

    #[test]
    fn test_request_from_value_rejects_non_object() {
        let err = request_from_value("gpt-x", json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, CompletionError::InvalidRequest(_)));
    }

    #[test]
    fn test_request_from_value_bad_messages() {
        let err = request_from_value("gpt-x", json!({"messages": "nope"})).unwrap_err();
        assert!(matches!(err, CompletionError::Serde(_)));
    }

    #[test]
    fn test_invoke_blocking() {
        let backend = ScriptedBackend::new();
        backend.push_text("gpt-x", ["blocking reply"]);

        let request = CreateChatCompletionRequest {
            messages: user_messages("hello"),
            ..Default::default()
        };

        let text = invoke_blocking("gpt-x", &backend, request).unwrap();
        assert_eq!(text, "blocking reply");
        assert_eq!(backend.requests()[0].model, "gpt-x");
    }

    #[tokio::test]
    async fn test_invoke_blocking_inside_runtime_is_an_error() {
        let backend = ScriptedBackend::new();
        backend.push_text("gpt-x", ["unused"]);

        let err = invoke_blocking("gpt-x", &backend, CreateChatCompletionRequest::default())
            .unwrap_err();
        assert!(matches!(err, CompletionError::NestedRuntime));
        assert!(backend.requests().is_empty());
        assert_eq!(backend.remaining(), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_invoke_logs_model() {
        let backend = ScriptedBackend::new();
        backend.push_text("gpt-x", ["ok"]);

        invoke("gpt-x", &backend, CreateChatCompletionRequest::default())
            .await
            .unwrap();
        assert!(logs_contain("gpt-x is running"));
    }
}
