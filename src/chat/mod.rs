
use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::generation::SourceRef;
use crate::query::{AskRequest, AskResponse};

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub message: String,
    pub sources: Vec<SourceRef>,
}

/// In-memory ordered conversation history.
///
/// Lives only as long as the chat process; nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_user(&mut self, message: String) {
        self.entries.push(TranscriptEntry {
            role: Role::User,
            message,
            sources: Vec::new(),
        });
    }

    #[inline]
    pub fn push_assistant(&mut self, message: String, sources: Vec<SourceRef>) {
        self.entries.push(TranscriptEntry {
            role: Role::Assistant,
            message,
            sources,
        });
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Blocking client for the local question-answering API
#[derive(Debug, Clone)]
pub struct ApiClient {
    ask_url: Url,
    agent: ureq::Agent,
}

impl ApiClient {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config
            .api_url()
            .context("Failed to generate API URL from config")?;
        let ask_url = base_url.join("/ask").context("Failed to build ask URL")?;

        // The API call covers embedding plus generation, so reuse the
        // generation timeout
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(
                config.ollama.request_timeout_secs,
            )))
            .build()
            .into();

        Ok(Self { ask_url, agent })
    }

    /// Submit a question to the running service
    #[inline]
    pub fn ask(&self, question: &str) -> Result<AskResponse> {
        let request = AskRequest {
            question: question.to_string(),
        };
        let request_json =
            serde_json::to_string(&request).context("Failed to serialize ask request")?;

        let response_text = self
            .agent
            .post(self.ask_url.as_str())
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .context("Failed to reach the question-answering API")?;

        serde_json::from_str(&response_text).context("Failed to parse ask response")
    }
}

/// Interactive chat loop against the local API.
///
/// Each turn re-renders the whole transcript, so the screen always shows
/// the full conversation in order.
#[inline]
pub fn run_chat(config: &Config) -> Result<()> {
    let client = ApiClient::new(config)?;
    let mut transcript = Transcript::new();
    let term = console::Term::stderr();

    render(&term, &transcript)?;

    loop {
        let question: String = Input::new().with_prompt("You").interact_text()?;
        let trimmed = question.trim();

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            eprintln!("{}", style("Goodbye!").dim());
            return Ok(());
        }

        transcript.push_user(trimmed.to_string());

        let response = client.ask(trimmed)?;
        transcript.push_assistant(response.answer, response.sources);

        render(&term, &transcript)?;
    }
}

fn render(term: &console::Term, transcript: &Transcript) -> Result<()> {
    term.clear_screen()
        .context("Failed to clear chat screen")?;

    eprintln!("{}", style("💬 PDF Chat").bold().cyan());
    eprintln!(
        "{}",
        style("Ask questions about your PDFs. Type 'exit' to leave.").dim()
    );
    eprintln!();

    for entry in transcript.entries() {
        match entry.role {
            Role::User => {
                eprintln!("{} {}", style("You:").bold().green(), entry.message);
            }
            Role::Assistant => {
                eprintln!("{} {}", style("Assistant:").bold().cyan(), entry.message);
                for source in &entry.sources {
                    eprintln!(
                        "  {}",
                        style(format!(
                            "📚 {} (page {})",
                            source.file_name, source.page
                        ))
                        .dim()
                    );
                }
            }
        }
        eprintln!();
    }

    Ok(())
}
