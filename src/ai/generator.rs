//! Code generation seam used by the conversion pipeline

use crate::ai::{AiClient, AiError, AiResult, ConversionPromptBuilder, Message, PromptTemplate};
use crate::models::SourceMetadata;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Output language of the generated Playwright test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    TypeScript,
    JavaScript,
}

impl TargetLanguage {
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::TypeScript => "TypeScript",
            TargetLanguage::JavaScript => "JavaScript",
        }
    }

    /// Extension of the written test file, including the `.spec` marker
    pub fn extension(&self) -> &'static str {
        match self {
            TargetLanguage::TypeScript => ".spec.ts",
            TargetLanguage::JavaScript => ".spec.js",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetLanguage::TypeScript => f.write_str("typescript"),
            TargetLanguage::JavaScript => f.write_str("javascript"),
        }
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" => Ok(TargetLanguage::TypeScript),
            "javascript" | "js" => Ok(TargetLanguage::JavaScript),
            _ => Err(format!(
                "Unknown language: {}. Valid options: typescript, javascript",
                s
            )),
        }
    }
}

/// Produces Playwright code for one Java source file
pub trait CodeGenerator: Send + Sync {
    fn generate(
        &self,
        source: &str,
        metadata: &SourceMetadata,
        language: TargetLanguage,
    ) -> AiResult<String>;
}

/// [`CodeGenerator`] backed by an LLM
pub struct LlmGenerator {
    client: AiClient,
}

impl LlmGenerator {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AiClient {
        &self.client
    }
}

impl CodeGenerator for LlmGenerator {
    fn generate(
        &self,
        source: &str,
        metadata: &SourceMetadata,
        language: TargetLanguage,
    ) -> AiResult<String> {
        let prompt = ConversionPromptBuilder::new(source, language)
            .metadata(metadata)
            .build();

        info!(
            "Converting {} with {} ({})",
            if metadata.file_name.is_empty() { "<source>" } else { metadata.file_name.as_str() },
            self.client.backend(),
            self.client.model()
        );

        let response = self
            .client
            .generate(vec![Message::user(prompt)], Some(PromptTemplate::system_prompt()))?;
        debug!("model answered with {} bytes", response.len());

        let code = strip_code_fences(&response);
        if code.is_empty() {
            return Err(AiError::ParseError("model returned no code".to_string()));
        }
        Ok(code)
    }
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_+-]*[ \t]*\r?\n(.*?)\r?\n?```\s*$").expect("valid regex")
    })
}

/// Remove a Markdown code fence wrapped around a model answer
pub fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    match fence_pattern().captures(trimmed) {
        Some(caps) => caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_extension() {
        assert_eq!(TargetLanguage::TypeScript.extension(), ".spec.ts");
        assert_eq!(TargetLanguage::JavaScript.extension(), ".spec.js");
        assert_eq!("js".parse::<TargetLanguage>().unwrap(), TargetLanguage::JavaScript);
        assert!("python".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn test_strip_fenced_answer() {
        let answer = "```typescript\nimport { test } from '@playwright/test';\n```\n";
        assert_eq!(
            strip_code_fences(answer),
            "import { test } from '@playwright/test';"
        );
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fences("```\nconst a = 1;\n```"), "const a = 1;");
    }

    #[test]
    fn test_unfenced_answer_is_trimmed() {
        assert_eq!(strip_code_fences("  const a = 1;\n\n"), "const a = 1;");
    }

    #[test]
    fn test_inner_fences_are_kept() {
        let answer = "Here you go:\n```ts\nx\n```";
        assert_eq!(strip_code_fences(answer), answer);
    }
}
