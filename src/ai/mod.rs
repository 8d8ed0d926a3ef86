//! LLM-backed code generation
//!
//! The translation from Selenium/TestNG Java to Playwright is done by a
//! language model. This module provides the HTTP client for the supported
//! backends (a local Ollama server by default, or Anthropic/OpenAI with your
//! own key), the fixed conversion prompts, and the [`CodeGenerator`] seam the
//! conversion pipeline is written against.
//!
//! # Environment Variables
//!
//! - `OLLAMA_HOST`: Ollama base URL (default `http://localhost:11434`)
//! - `ANTHROPIC_API_KEY`: Required for the Anthropic backend
//! - `OPENAI_API_KEY`: Required for the OpenAI backend
//!
//! # Example
//!
//! ```rust,ignore
//! use seleniport::ai::{AiClient, AiConfig, CodeGenerator, LlmGenerator, TargetLanguage};
//!
//! let client = AiClient::connect(AiConfig::default(), None)?;
//! let generator = LlmGenerator::new(client);
//! let code = generator.generate(&source, &metadata, TargetLanguage::TypeScript)?;
//! ```

mod client;
mod generator;
mod prompts;

pub use client::{AiClient, AiConfig, LlmBackend, Message, Role, DEFAULT_OLLAMA_URL};
pub use generator::{strip_code_fences, CodeGenerator, LlmGenerator, TargetLanguage};
pub use prompts::{ConversionPromptBuilder, PromptTemplate};

use thiserror::Error;

/// Errors that can occur in the AI module
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type AiResult<T> = Result<T, AiError>;
