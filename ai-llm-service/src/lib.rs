//! OpenAI-compatible chat completion client.
//!
//! The crate exposes one generation entry point,
//! [`OpenAiService::generate`](services::open_ai_service::OpenAiService::generate),
//! used for every review regardless of which event produced the prompt.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod services;

pub use chat::{ChatMessage, Role, flatten_messages};
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError};
pub use services::open_ai_service::{Completion, GenerateOptions, OpenAiService, Usage};
