use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
};
use azure_completion::{invoke, resolve};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let model = args.next().unwrap_or_else(|| "gpt-4o-mini".to_string());
    let prompt = args
        .next()
        .unwrap_or_else(|| "What is the capital of France?".to_string());

    let client = resolve(&model)?;

    let req = CreateChatCompletionRequest {
        messages: vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content("You are a helpful assistant.")
                    .build()?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?,
            ),
        ],
        ..Default::default()
    };

    let answer = invoke(&model, &client, req).await?;
    println!("{answer}");

    Ok(())
}
