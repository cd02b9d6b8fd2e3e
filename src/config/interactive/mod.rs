
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::{Config, ConfigError, OllamaConfig, ServerConfig};

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 PDF RAG Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("Ollama Configuration").bold().yellow());
    eprintln!("Configure your local Ollama instance for embeddings and answer generation.");
    eprintln!();

    configure_ollama(&mut config.ollama)?;

    eprintln!();
    eprintln!("{}", style("Server Configuration").bold().yellow());
    configure_server(&mut config.server)?;

    eprintln!();
    let pdf_dir: String = Input::new()
        .with_prompt("PDF directory")
        .default(config.pdf_dir_path().display().to_string())
        .interact_text()?;
    config.pdf_dir = Some(pdf_dir.into());

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if test_ollama_connection(&config)? {
        eprintln!("{}", style("✓ Ollama connection successful!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not connect to Ollama").yellow()
        );
        eprintln!("You can continue, but make sure Ollama is running before ingesting or serving.");
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Ollama Settings:").bold().yellow());
    eprintln!("  Host: {}", style(&config.ollama.host).cyan());
    eprintln!("  Port: {}", style(config.ollama.port).cyan());
    eprintln!(
        "  Embedding Model: {}",
        style(&config.ollama.embedding_model).cyan()
    );
    eprintln!("  LLM Model: {}", style(&config.ollama.llm_model).cyan());
    eprintln!("  Batch Size: {}", style(config.ollama.batch_size).cyan());
    eprintln!(
        "  Request Timeout: {}s",
        style(config.ollama.request_timeout_secs).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Server Settings:").bold().yellow());
    eprintln!("  Address: {}", style(config.server.bind_addr()).cyan());

    eprintln!();
    eprintln!("{}", style("Paths:").bold().yellow());
    eprintln!(
        "  PDF directory: {}",
        style(config.pdf_dir_path().display()).cyan()
    );
    eprintln!(
        "  Vector collection: {}",
        style(config.vector_db_path().display()).cyan()
    );

    eprintln!();
    match config.ollama_url() {
        Ok(url) => eprintln!("  Ollama URL: {}", style(url).cyan()),
        Err(e) => eprintln!("  Ollama URL: {} ({})", style("Invalid").red(), e),
    }

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    Config::load().map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            let mut config = Config::default();
            config.base_dir = Config::default_dir().map_err(anyhow::Error::from)?;
            Ok(config)
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_ollama(ollama: &mut OllamaConfig) -> Result<()> {
    let protocols = &["http", "https"];
    let default_index = protocols
        .iter()
        .position(|&p| p == ollama.protocol)
        .unwrap_or(0);

    let protocol_index = Select::new()
        .with_prompt("Ollama protocol")
        .default(default_index)
        .items(protocols)
        .interact()?;
    set_with_retry(|| {
        ollama.set_protocol(protocols[protocol_index].to_string())
    })?;

    let host: String = Input::new()
        .with_prompt("Ollama host")
        .default(ollama.host.clone())
        .interact_text()?;
    set_with_retry(|| ollama.set_host(host.clone()))?;

    let port: u16 = Input::new()
        .with_prompt("Ollama port")
        .default(ollama.port)
        .interact_text()?;
    set_with_retry(|| ollama.set_port(port))?;

    let embedding_model: String = Input::new()
        .with_prompt("Embedding model")
        .default(ollama.embedding_model.clone())
        .interact_text()?;
    set_with_retry(|| ollama.set_embedding_model(embedding_model.clone()))?;

    let llm_model: String = Input::new()
        .with_prompt("Generation model")
        .default(ollama.llm_model.clone())
        .interact_text()?;
    set_with_retry(|| ollama.set_llm_model(llm_model.clone()))?;

    let batch_size: u32 = Input::new()
        .with_prompt("Embedding batch size")
        .default(ollama.batch_size)
        .interact_text()?;
    set_with_retry(|| ollama.set_batch_size(batch_size))?;

    Ok(())
}

fn configure_server(server: &mut ServerConfig) -> Result<()> {
    let host: String = Input::new()
        .with_prompt("API host")
        .default(server.host.clone())
        .interact_text()?;
    server.host = host;

    let port: u16 = Input::new()
        .with_prompt("API port")
        .default(server.port)
        .interact_text()?;
    server.port = port;

    server.validate()?;
    Ok(())
}

fn set_with_retry<F>(mut setter: F) -> Result<()>
where
    F: FnMut() -> Result<(), ConfigError>,
{
    match setter() {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{} {}", style("Invalid value:").red(), e);
            Err(e.into())
        }
    }
}

fn test_ollama_connection(config: &Config) -> Result<bool> {
    match crate::embeddings::ollama::OllamaClient::new(config) {
        Ok(client) => Ok(client.ping().is_ok()),
        Err(_) => Ok(false),
    }
}
