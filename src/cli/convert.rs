//! Convert command - Selenium Java to Playwright

use crate::ai::{AiClient, LlmBackend, LlmGenerator, TargetLanguage};
use crate::config::UserConfig;
use crate::pipeline::{self, collect_java_files, Converter};
use anyhow::{bail, Context, Result};
use console::style;
use std::path::PathBuf;

pub struct ConvertOptions {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub language: Option<String>,
    pub backend: Option<String>,
    pub model: Option<String>,
    pub dry_run: bool,
}

pub fn run(opts: ConvertOptions) -> Result<()> {
    let config = UserConfig::load()?;

    let language = match opts.language.as_deref() {
        Some(name) => name.parse::<TargetLanguage>().map_err(anyhow::Error::msg)?,
        None => config.language(),
    };

    if !opts.path.exists() {
        bail!("{} is not a valid file or directory", opts.path.display());
    }

    if opts.dry_run {
        return dry_run(&opts.path, language);
    }

    let backend = match opts.backend.as_deref() {
        Some(name) => name.parse::<LlmBackend>()?,
        None => config.backend(),
    };
    let mut ai_config = config.ai_config(backend);
    if opts.model.is_some() {
        ai_config.model = opts.model;
    }
    let api_key = config.api_key(backend).map(str::to_string);
    let client = AiClient::connect(ai_config, api_key)?;

    let output_dir = opts.output.unwrap_or_else(|| config.output_dir());
    let converter = Converter::new(Box::new(LlmGenerator::new(client)))
        .language(language)
        .output_dir(&output_dir)
        .show_progress(opts.path.is_dir());

    if opts.path.is_file() {
        println!("Converting: {}", opts.path.display());
        let outcome = converter.convert_file(&opts.path)?;
        println!(
            "{} Success! Output: {}",
            style("✓").green(),
            outcome.output_file.display()
        );
        return Ok(());
    }

    let entries = converter.convert_path(&opts.path)?;
    println!("Found {} Java files", entries.len());

    let mut failed = 0;
    for entry in &entries {
        match &entry.result {
            Ok(outcome) => println!(
                "  {} {} -> {}",
                style("✓").green(),
                entry.input.display(),
                outcome.output_file.display()
            ),
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", style("✗").red(), entry.input.display(), e);
            }
        }
    }

    println!(
        "\n{} converted, {} failed",
        style(entries.len() - failed).cyan(),
        if failed > 0 { style(failed).red() } else { style(failed).dim() }
    );
    if failed > 0 {
        bail!("{} of {} files failed to convert", failed, entries.len());
    }
    Ok(())
}

fn dry_run(path: &std::path::Path, language: TargetLanguage) -> Result<()> {
    let mut failed = 0;
    let files = collect_java_files(path);
    for file in &files {
        let source = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        let name = file.display().to_string();
        match pipeline::dry_run(&source, &name, language) {
            Ok((_, prompt)) => {
                println!(
                    "{} {} -> {}",
                    style("==>").cyan(),
                    name,
                    pipeline::output_name(&name, language)
                );
                println!("{}", prompt);
            }
            Err(e) => {
                failed += 1;
                println!("{} {}: {}", style("✗").red(), name, e);
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} files failed to parse", failed, files.len());
    }
    Ok(())
}
