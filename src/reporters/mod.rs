//! Output reporters for extracted metadata
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON, the record handed to conversion

mod json;
mod text;

use crate::models::SourceMetadata;
use crate::pipeline::ParsedFile;
use anyhow::{anyhow, Result};
use std::str::FromStr;

pub use json::render_compact;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Text,
    #[default]
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render one file's metadata
pub fn report(metadata: &SourceMetadata, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(metadata),
        OutputFormat::Json => json::render(metadata),
    }
}

/// Render the results of a directory parse
pub fn report_batch(files: &[ParsedFile], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_batch(files),
        OutputFormat::Json => json::render_batch(files),
    }
}
