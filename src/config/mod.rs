// Configuration management module
// Handles TOML configuration for Ollama, the HTTP server, and ingestion paths

pub mod interactive;
pub mod settings;

pub use interactive::{run_interactive_config, show_config};
pub use settings::{Config, ConfigError, OllamaConfig, ServerConfig};
