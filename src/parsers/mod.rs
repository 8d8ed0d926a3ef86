//! Java source parsing and metadata extraction
//!
//! A [`JavaFrontend`] turns source text into a [`tree::CompilationUnit`];
//! [`extract::extract`] walks it into a [`SourceMetadata`] record. The only
//! failure is [`ParseError::SyntaxInvalid`], and it is all-or-nothing: no
//! metadata is produced for a file that does not parse.

pub mod extract;
pub mod imports;
pub mod java;
pub mod tree;

use crate::models::SourceMetadata;
use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;

pub use java::TreeSitterJava;

/// Errors raised while turning source text into a tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Java syntax error: {message}")]
    SyntaxInvalid { message: String },
}

impl ParseError {
    pub fn syntax(message: impl Into<String>) -> Self {
        ParseError::SyntaxInvalid {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::SyntaxInvalid { message } => message,
        }
    }
}

/// Source text to syntax tree
pub trait JavaFrontend {
    /// Parse `source`; `label` names the input in error messages and may be empty
    fn parse(&self, source: &str, label: &str) -> std::result::Result<tree::CompilationUnit, ParseError>;
}

/// Parse Java source with the default front-end and extract its metadata
pub fn parse_source(source: &str, file_name: &str) -> std::result::Result<SourceMetadata, ParseError> {
    parse_source_with(&TreeSitterJava, source, file_name)
}

/// Parse Java source with a specific front-end
pub fn parse_source_with(
    frontend: &dyn JavaFrontend,
    source: &str,
    file_name: &str,
) -> std::result::Result<SourceMetadata, ParseError> {
    let unit = frontend.parse(source, file_name)?;
    Ok(extract::extract(&unit, file_name))
}

/// Read and parse a Java file
pub fn parse_file(path: &Path) -> Result<SourceMetadata> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let metadata = parse_source(&source, &path.display().to_string())?;
    Ok(metadata)
}

/// True for paths with a `.java` extension
pub fn is_java_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("java"))
}
