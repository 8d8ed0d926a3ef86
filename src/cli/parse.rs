//! Parse command - extract metadata without converting

use crate::parsers;
use crate::pipeline::{collect_java_files, parse_all};
use crate::reporters::{self, OutputFormat};
use anyhow::{bail, Context, Result};
use console::style;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub fn run(path: &Path, format: &str, compact: bool, output: Option<&Path>) -> Result<()> {
    let format = OutputFormat::from_str(format)?;

    if !path.exists() {
        bail!("{} is not a valid file or directory", path.display());
    }

    if path.is_file() {
        let metadata = parsers::parse_file(path)?;
        let rendered = match format {
            OutputFormat::Json if compact => reporters::render_compact(&metadata)?,
            _ => reporters::report(&metadata, format)?,
        };
        return emit(&rendered, output);
    }

    let files = collect_java_files(path);
    info!("Parsing {} Java files under {}", files.len(), path.display());
    if files.is_empty() {
        eprintln!("{} no .java files under {}", style("!").yellow(), path.display());
    }

    let results = parse_all(&files);
    emit(&reporters::report_batch(&results, format)?, output)?;

    let failed = results.iter().filter(|r| r.result.is_err()).count();
    if failed > 0 {
        bail!("{} of {} files failed to parse", failed, results.len());
    }
    Ok(())
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(file) => {
            let plain = console::strip_ansi_codes(rendered);
            std::fs::write(file, plain.as_bytes())
                .with_context(|| format!("Failed to write {}", file.display()))?;
            eprintln!("{} wrote {}", style("✓").green(), file.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
