//! Text (terminal) reporter with colors and formatting

use crate::models::SourceMetadata;
use crate::parsers::imports::is_test_framework_annotation;
use crate::pipeline::ParsedFile;
use anyhow::Result;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Render metadata for one file as terminal output
pub fn render(metadata: &SourceMetadata) -> Result<String> {
    let mut out = String::new();
    push_metadata(&mut out, metadata);
    Ok(out)
}

/// Render a batch, one section per file, with a summary line
pub fn render_batch(files: &[ParsedFile]) -> Result<String> {
    let mut out = String::new();
    let mut failed = 0;

    for file in files {
        match &file.result {
            Ok(metadata) => push_metadata(&mut out, metadata),
            Err(message) => {
                failed += 1;
                out.push_str(&format!(
                    "\n{BOLD}{}{RESET}\n  {RED}error:{RESET} {}\n",
                    file.path.display(),
                    message
                ));
            }
        }
    }

    let ok = files.len() - failed;
    let color = if failed == 0 { GREEN } else { YELLOW };
    out.push_str(&format!(
        "\n{color}{} parsed{RESET}, {} failed, {} total\n",
        ok,
        failed,
        files.len()
    ));
    Ok(out)
}

fn push_metadata(out: &mut String, metadata: &SourceMetadata) {
    let title = if metadata.file_name.is_empty() {
        "<source>"
    } else {
        metadata.file_name.as_str()
    };
    out.push_str(&format!("\n{BOLD}{}{RESET}\n", title));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));

    let class = if metadata.class_name.is_empty() {
        format!("{DIM}(none){RESET}")
    } else {
        format!("{CYAN}{}{RESET}", metadata.class_name)
    };
    out.push_str(&format!("Class: {}  ", class));
    out.push_str(&format!(
        "Imports: {} ({} automation)  TestNG: {}\n",
        metadata.imports.len(),
        metadata.automation_imports.len(),
        if metadata.uses_test_framework { "yes" } else { "no" }
    ));

    if metadata.methods.is_empty() {
        out.push_str(&format!("  {DIM}no methods{RESET}\n"));
        return;
    }

    for method in &metadata.methods {
        let annotations: Vec<String> = method
            .annotations
            .iter()
            .map(|a| {
                if is_test_framework_annotation(a) {
                    format!("{YELLOW}@{}{RESET}", a)
                } else {
                    format!("{DIM}@{}{RESET}", a)
                }
            })
            .collect();
        if annotations.is_empty() {
            out.push_str(&format!("\n  {BOLD}{}{RESET}\n", method.name));
        } else {
            out.push_str(&format!(
                "\n  {} {BOLD}{}{RESET}\n",
                annotations.join(" "),
                method.name
            ));
        }
        for (i, call) in method.calls.iter().enumerate() {
            out.push_str(&format!("    {DIM}{:>3}{RESET}  {}\n", i + 1, call.display()));
        }
    }
}
