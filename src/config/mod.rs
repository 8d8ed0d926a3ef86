//! Configuration module for Seleniport
//!
//! User-level settings for the LLM backend and the conversion output,
//! read from `~/.config/seleniport/config.toml` and the environment.

mod user_config;

pub use user_config::{mask_key, AiSettings, ConvertSettings, UserConfig};
