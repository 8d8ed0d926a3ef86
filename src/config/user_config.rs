//! User-level configuration for seleniport
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/seleniport/config.toml

use crate::ai::{self, LlmBackend, TargetLanguage, DEFAULT_OLLAMA_URL};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub convert: ConvertSettings,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct AiSettings {
    /// AI backend: "ollama" (default), "anthropic", "openai"
    pub backend: Option<String>,

    /// Model for the active backend; for Ollama it wins over `ollama_model`
    pub model: Option<String>,

    /// Ollama URL (default: http://localhost:11434)
    pub ollama_url: Option<String>,

    /// Ollama model (default: codellama)
    pub ollama_model: Option<String>,

    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,

    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ConvertSettings {
    /// "typescript" (default) or "javascript"
    pub language: Option<String>,

    /// Directory converted tests are written to (default: output)
    pub output_dir: Option<PathBuf>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/seleniport/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = match Self::user_config_path() {
            Some(path) => Self::load_from(&path),
            None => UserConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a config file; a missing or invalid file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let mut config = UserConfig::default();
        if !path.exists() {
            return config;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                return config;
            }
        };

        match toml::from_str::<UserConfig>(&content) {
            Ok(user_config) => {
                debug!("Loaded user config from {}", path.display());
                config.merge(user_config);
            }
            Err(e) => warn!("Ignoring invalid config {}: {}", path.display(), e),
        }
        config
    }

    /// Environment variables override file values
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("SELENIPORT_BACKEND") {
            self.ai.backend = Some(backend);
        }
        if let Some(model) = lookup("SELENIPORT_MODEL") {
            self.ai.model = Some(model);
        }
        if let Some(url) = lookup("OLLAMA_HOST") {
            self.ai.ollama_url = Some(url);
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.ai.anthropic_api_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.ai.openai_api_key = Some(key);
        }
    }

    /// Get the user config directory path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("seleniport").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        let UserConfig { ai, convert } = other;
        if ai.backend.is_some() {
            self.ai.backend = ai.backend;
        }
        if ai.model.is_some() {
            self.ai.model = ai.model;
        }
        if ai.ollama_url.is_some() {
            self.ai.ollama_url = ai.ollama_url;
        }
        if ai.ollama_model.is_some() {
            self.ai.ollama_model = ai.ollama_model;
        }
        if ai.anthropic_api_key.is_some() {
            self.ai.anthropic_api_key = ai.anthropic_api_key;
        }
        if ai.openai_api_key.is_some() {
            self.ai.openai_api_key = ai.openai_api_key;
        }
        if ai.temperature.is_some() {
            self.ai.temperature = ai.temperature;
        }
        if ai.max_tokens.is_some() {
            self.ai.max_tokens = ai.max_tokens;
        }
        if convert.language.is_some() {
            self.convert.language = convert.language;
        }
        if convert.output_dir.is_some() {
            self.convert.output_dir = convert.output_dir;
        }
    }

    /// Configured backend; an unknown name falls back to Ollama
    pub fn backend(&self) -> LlmBackend {
        match self.ai.backend.as_deref() {
            Some(name) => name.parse().unwrap_or_else(|e| {
                warn!("{}; using ollama", e);
                LlmBackend::Ollama
            }),
            None => LlmBackend::default(),
        }
    }

    /// Get Ollama URL
    pub fn ollama_url(&self) -> &str {
        self.ai.ollama_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL)
    }

    /// Get Ollama model
    pub fn ollama_model(&self) -> &str {
        self.ai.ollama_model.as_deref().unwrap_or("codellama")
    }

    /// API key for a backend, if configured
    pub fn api_key(&self, backend: LlmBackend) -> Option<&str> {
        match backend {
            LlmBackend::Ollama => None,
            LlmBackend::Anthropic => self.ai.anthropic_api_key.as_deref(),
            LlmBackend::OpenAi => self.ai.openai_api_key.as_deref(),
        }
    }

    pub fn language(&self) -> TargetLanguage {
        match self.convert.language.as_deref() {
            Some(name) => name.parse().unwrap_or_else(|e| {
                warn!("{}; using typescript", e);
                TargetLanguage::TypeScript
            }),
            None => TargetLanguage::default(),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.convert
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("output"))
    }

    /// Client settings for `backend`
    pub fn ai_config(&self, backend: LlmBackend) -> ai::AiConfig {
        let defaults = ai::AiConfig::default();
        let (model, base_url) = match backend {
            LlmBackend::Ollama => (
                Some(
                    self.ai
                        .model
                        .clone()
                        .unwrap_or_else(|| self.ollama_model().to_string()),
                ),
                Some(self.ollama_url().to_string()),
            ),
            _ => (self.ai.model.clone(), None),
        };
        ai::AiConfig {
            backend,
            model,
            base_url,
            max_tokens: self.ai.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.ai.temperature.unwrap_or(defaults.temperature),
        }
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            let example = r#"# Seleniport User Configuration

[ai]
# Backend: "ollama" (free, local), "anthropic" or "openai" (need API key)
# backend = "ollama"

# For Ollama backend (free, runs locally)
# ollama_url = "http://localhost:11434"
# ollama_model = "codellama"  # or "deepseek-coder", "qwen2.5-coder", etc.

# Model for whichever backend is active (overrides ollama_model)
# model = "claude-sonnet-4-20250514"
# anthropic_api_key = "sk-ant-..."
# openai_api_key = "sk-..."

# temperature = 0.1
# max_tokens = 2048

[convert]
# language = "typescript"  # or "javascript"
# output_dir = "output"
"#;
            std::fs::write(&config_path, example)?;
        }

        Ok(config_path)
    }
}

/// Mask all but the last four characters of a secret
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
