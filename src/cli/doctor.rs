//! Doctor command - check environment

use crate::ai::{AiClient, LlmBackend};
use crate::config::UserConfig;
use crate::parsers;
use anyhow::{bail, Result};

const GRAMMAR_CHECK_SOURCE: &str = "import org.openqa.selenium.By;\nclass Check { void m() { a.b(); } }";

pub fn run() -> Result<()> {
    println!("🩺 Seleniport Doctor\n");
    let mut ok = true;

    match parsers::parse_source(GRAMMAR_CHECK_SOURCE, "") {
        Ok(metadata) if metadata.call_count() == 1 => println!("✓ Java grammar: OK"),
        Ok(_) => {
            ok = false;
            println!("✗ Java grammar: loaded, but extraction returned unexpected results");
        }
        Err(e) => {
            ok = false;
            println!("✗ Java grammar: {}", e);
        }
    }

    let config = UserConfig::load()?;
    let backend = config.backend();
    match backend {
        LlmBackend::Ollama => {
            let url = config.ollama_url();
            if AiClient::ollama_reachable(url) {
                println!("✓ Ollama: reachable at {} (model {})", url, config.ollama_model());
            } else {
                ok = false;
                println!("✗ Ollama: not reachable at {}", url);
                println!("  Start it with `ollama serve` and `ollama pull {}`", config.ollama_model());
                println!("  or set SELENIPORT_BACKEND=anthropic|openai with an API key");
            }
        }
        _ => {
            if config.api_key(backend).is_some() {
                println!("✓ {}: API key configured", backend);
            } else {
                ok = false;
                println!("✗ {}: {} not set", backend, backend.env_key());
                println!("  Get a key at {}", backend.signup_url());
            }
        }
    }

    if !ok {
        println!("\n⚠️  Some checks failed; `parse` still works, `convert` needs a backend.");
        bail!("doctor found problems");
    }
    println!("\n✅ All checks passed!");
    Ok(())
}
