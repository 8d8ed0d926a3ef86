//! CLI command definitions and handlers

mod convert;
mod doctor;
mod parse;

use crate::config::{mask_key, UserConfig};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Seleniport - Selenium/TestNG to Playwright migration
#[derive(Parser, Debug)]
#[command(name = "seleniport")]
#[command(
    version,
    about = "Migrate Selenium/TestNG Java tests to Playwright",
    long_about = "Seleniport parses Selenium/TestNG Java test sources into a structured \
record (imports, test methods, annotations and the ordered browser calls of each \
method) and hands that record plus the source to an LLM that writes the \
equivalent Playwright test.\n\n\
Runs against a local Ollama server by default; Anthropic and OpenAI work with your own key.",
    after_help = "\
Examples:
  seleniport parse LoginTest.java                 Print extracted metadata as JSON
  seleniport parse src/test/java --format text    Summarize every test file
  seleniport convert LoginTest.java               Write output/login-test.spec.ts
  seleniport convert src/test/java -l javascript  Convert a whole directory to JS
  seleniport doctor                               Check grammar and LLM backend"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract metadata from a Java file or every .java file in a directory
    #[command(after_help = "\
Examples:
  seleniport parse LoginTest.java
  seleniport parse tests/ --format text
  seleniport parse tests/ -o metadata.json        Exit code 1 if any file fails to parse")]
    Parse {
        /// Java file or directory
        path: PathBuf,

        /// Output format: json or text
        #[arg(long, short = 'f', default_value = "json", value_parser = ["json", "text"])]
        format: String,

        /// Single-line JSON (single file only)
        #[arg(long)]
        compact: bool,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Convert Java tests to Playwright with an LLM
    #[command(after_help = "\
Examples:
  seleniport convert LoginTest.java
  seleniport convert tests/ -o e2e -l javascript
  seleniport convert LoginTest.java --backend anthropic --model claude-sonnet-4-20250514
  seleniport convert LoginTest.java --dry-run     Show the prompt, call no model")]
    Convert {
        /// Java file or directory
        path: PathBuf,

        /// Output directory (default: config or ./output)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Target language: typescript or javascript
        #[arg(long, short = 'l', value_parser = ["typescript", "javascript", "ts", "js"])]
        language: Option<String>,

        /// LLM backend: ollama, anthropic, openai
        #[arg(long, env = "SELENIPORT_BACKEND")]
        backend: Option<String>,

        /// Model name (default depends on backend)
        #[arg(long)]
        model: Option<String>,

        /// Parse and print the prompt without calling a model or writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Check the Java grammar and the configured LLM backend
    Doctor,

    /// Manage configuration (init or show)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize config file with example settings
    Init,
    /// Show current config and paths
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Parse {
            path,
            format,
            compact,
            output,
        } => parse::run(&path, &format, compact, output.as_deref()),

        Commands::Convert {
            path,
            output,
            language,
            backend,
            model,
            dry_run,
        } => convert::run(convert::ConvertOptions {
            path,
            output,
            language,
            backend,
            model,
            dry_run,
        }),

        Commands::Doctor => doctor::run(),

        Commands::Config { action } => run_config_action(action),

        Commands::Version => {
            println!("seleniport {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_config_action(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("✅ Config initialized at: {}", path.display());
            println!("\nEdit to pick a backend or add an API key:");
            println!("  {}", path.display());
            println!("\nOr set via environment:");
            println!("  export SELENIPORT_BACKEND=anthropic");
            println!("  export ANTHROPIC_API_KEY=\"sk-ant-...\"");
            Ok(())
        }
        ConfigAction::Show => show_config(),
    }
}

fn show_config() -> Result<()> {
    let config = UserConfig::load()?;
    println!("📁 Config path:");
    if let Some(user_path) = UserConfig::user_config_path() {
        let status = if user_path.exists() { "✓" } else { "(not found)" };
        println!("  User: {} {}", user_path.display(), status);
    }
    println!();

    let backend = config.backend();
    let ai = config.ai_config(backend);
    println!("🤖 AI Backend: {}", backend);
    println!("  Model:       {}", ai.model());
    println!("  Endpoint:    {}", ai.endpoint());
    println!("  Temperature: {}", ai.temperature);
    println!("  Max tokens:  {}", ai.max_tokens);
    if backend.requires_api_key() {
        let key_status = match config.api_key(backend) {
            Some(key) => format!("✓ {}", mask_key(key)),
            None => "✗ not set".to_string(),
        };
        println!("  {}: {}", backend.env_key(), key_status);
    }
    println!();
    println!("📝 Conversion:");
    println!("  Language:   {}", config.language());
    println!("  Output dir: {}", config.output_dir().display());
    Ok(())
}
