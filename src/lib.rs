//! Resolve Azure OpenAI credentials for a model and run single chat
//! completions against it.
//!
//! ```rust,no_run
//! use async_openai::types::chat::{
//!     ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
//!     CreateChatCompletionRequest,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = azure_completion::resolve("gpt-4o-mini")?;
//! let request = CreateChatCompletionRequest {
//!     messages: vec![ChatCompletionRequestMessage::User(
//!         ChatCompletionRequestUserMessageArgs::default()
//!             .content("What is the capital of France?")
//!             .build()?,
//!     )],
//!     ..Default::default()
//! };
//! let answer = azure_completion::invoke("gpt-4o-mini", &client, request).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod convert;
pub mod credential;
pub mod env;
pub mod error;
pub mod invoke;
pub mod resolve;

pub use async_openai::types::chat::{CreateChatCompletionRequest, CreateChatCompletionResponse};
pub use backend::ChatCompletionBackend;
pub use backend::scripted::ScriptedBackend;
pub use credential::{Credential, CredentialsFile};
pub use env::{Environment, ProcessEnv};
pub use error::{CompletionError, Result};
pub use invoke::{first_choice_text, invoke, invoke_blocking, invoke_value};
pub use resolve::Resolver;

#[cfg(feature = "backend-azure")]
pub use backend::azure::AzureBackend;
#[cfg(feature = "backend-azure")]
pub use resolve::resolve;
