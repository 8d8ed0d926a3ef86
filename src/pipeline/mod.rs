//! Conversion pipeline
//!
//! Orchestrates one migration:
//! 1. Parse the Java source into [`SourceMetadata`]
//! 2. Ask the [`CodeGenerator`] for the Playwright equivalent
//! 3. Write `<kebab-name>.spec.ts` (or `.spec.js`) into the output directory
//!
//! A file that fails to parse never reaches the generator and writes nothing.
//! Directory batches record failures per file and keep going.

mod files;

pub use crate::ai::TargetLanguage;
pub use files::collect_java_files;

use crate::ai::{AiError, CodeGenerator, ConversionPromptBuilder};
use crate::models::SourceMetadata;
use crate::parsers::{self, ParseError};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort the conversion of one file
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Conversion error: {0}")]
    Generation(#[from] AiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub output_file: PathBuf,
    pub converted_code: String,
    pub metadata: SourceMetadata,
}

/// One file of a batch
#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub result: Result<ConversionOutcome, ConvertError>,
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drives parse, generate and write for single files or directories
pub struct Converter {
    generator: Box<dyn CodeGenerator>,
    language: TargetLanguage,
    output_dir: PathBuf,
    show_progress: bool,
}

impl Converter {
    pub fn new(generator: Box<dyn CodeGenerator>) -> Self {
        Self {
            generator,
            language: TargetLanguage::default(),
            output_dir: PathBuf::from("output"),
            show_progress: false,
        }
    }

    pub fn language(mut self, language: TargetLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Show a progress bar for directory batches
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Convert Java source text; `file_name` may be empty
    pub fn convert(&self, source: &str, file_name: &str) -> Result<ConversionOutcome, ConvertError> {
        let metadata = parsers::parse_source(source, file_name)?;
        debug!(
            "{}: class {}, {} methods, {} calls",
            file_name,
            metadata.class_name,
            metadata.methods.len(),
            metadata.call_count()
        );

        let converted_code = self.generator.generate(source, &metadata, self.language)?;

        let output_file = self.output_dir.join(output_name(file_name, self.language));
        fs::create_dir_all(&self.output_dir)?;
        fs::write(&output_file, &converted_code)?;
        info!("Wrote {}", output_file.display());

        Ok(ConversionOutcome {
            output_file,
            converted_code,
            metadata,
        })
    }

    /// Read and convert one Java file
    pub fn convert_file(&self, path: &Path) -> Result<ConversionOutcome, ConvertError> {
        let source = fs::read_to_string(path)?;
        self.convert(&source, &path.display().to_string())
    }

    /// Convert a single file, or every `.java` file under a directory
    pub fn convert_path(&self, input: &Path) -> Result<Vec<BatchEntry>, ConvertError> {
        if !input.exists() {
            return Err(ConvertError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a valid file or directory", input.display()),
            )));
        }

        let files = collect_java_files(input);
        info!("Found {} Java files under {}", files.len(), input.display());

        let bar = if self.show_progress && files.len() > 1 {
            let bar = ProgressBar::new(files.len() as u64);
            bar.set_style(bar_style());
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut written = HashSet::new();
        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            bar.set_message(file.display().to_string());
            let result = self.convert_file(&file);
            match &result {
                Ok(outcome) => {
                    if !written.insert(outcome.output_file.clone()) {
                        warn!(
                            "{} overwrote an earlier output {}",
                            file.display(),
                            outcome.output_file.display()
                        );
                    }
                }
                Err(e) => warn!("{}: {}", file.display(), e),
            }
            entries.push(BatchEntry { input: file, result });
            bar.inc(1);
        }
        bar.finish_and_clear();

        Ok(entries)
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ")
}

/// Parse outcome for one file of a batch
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub result: Result<SourceMetadata, String>,
}

/// Extract metadata from many files in parallel, keeping input order
pub fn parse_all(files: &[PathBuf]) -> Vec<ParsedFile> {
    files
        .par_iter()
        .map(|path| ParsedFile {
            path: path.clone(),
            result: parsers::parse_file(path).map_err(|e| format!("{:#}", e)),
        })
        .collect()
}

/// Parse and build the conversion prompt without calling a model
pub fn dry_run(
    source: &str,
    file_name: &str,
    language: TargetLanguage,
) -> Result<(SourceMetadata, String), ParseError> {
    let metadata = parsers::parse_source(source, file_name)?;
    let prompt = ConversionPromptBuilder::new(source, language)
        .metadata(&metadata)
        .build();
    Ok((metadata, prompt))
}

/// Output file name: `LoginTest.java` -> `login-test.spec.ts`
pub fn output_name(file_name: &str, language: TargetLanguage) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty());
    match stem {
        Some(stem) => format!("{}{}", camel_to_kebab(stem), language.extension()),
        None => format!("converted{}", language.extension()),
    }
}

/// `LoginTest` -> `login-test`; every uppercase letter after the first starts a word
pub fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(c.to_lowercase());
    }
    out
}
