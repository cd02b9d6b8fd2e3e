pub mod citation;

#[cfg(test)]
mod tests;

pub use citation::{SourceRef, extract_sources};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::database::ChunkMetadata;

/// Blocking Ollama completion client for answer generation
#[derive(Debug, Clone)]
pub struct GenerationClient {
    base_url: Url,
    model: String,
    temperature: f32,
    num_ctx: u32,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl GenerationClient {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config
            .ollama_url()
            .context("Failed to generate Ollama URL from config")?;

        // Completions take far longer than embeddings, so the timeout
        // comes from config rather than a fixed constant
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(
                config.ollama.request_timeout_secs,
            )))
            .build()
            .into();

        Ok(Self {
            base_url,
            model: config.ollama.llm_model.clone(),
            temperature: config.ollama.temperature,
            num_ctx: config.ollama.num_ctx,
            agent,
        })
    }

    /// Generate an answer to a question grounded in the retrieved chunks
    #[inline]
    pub fn generate_answer(&self, question: &str, chunks: &[ChunkMetadata]) -> Result<String> {
        let prompt = build_prompt(question, chunks);

        debug!(
            "Generating answer with model {} (prompt length: {})",
            self.model,
            prompt.len()
        );

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_ctx: self.num_ctx,
            },
        };

        let url = self
            .base_url
            .join("/api/generate")
            .context("Failed to build generation URL")?;

        let request_json =
            serde_json::to_string(&request).context("Failed to serialize generation request")?;

        let response_text = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .context("Failed to generate answer from Ollama")?;

        let generate_response: GenerateResponse = serde_json::from_str(&response_text)
            .context("Failed to parse generation response")?;

        let answer = generate_response.response.trim().to_string();
        info!("Generated answer ({} chars)", answer.len());

        Ok(answer)
    }
}

/// Assemble the question-answering prompt from retrieved context
#[inline]
#[must_use]
pub fn build_prompt(question: &str, chunks: &[ChunkMetadata]) -> String {
    let mut context = String::new();
    for chunk in chunks {
        let _ = writeln!(
            context,
            "[{}, page {}]\n{}\n",
            chunk.file_name, chunk.page_label, chunk.content
        );
    }

    format!(
        "Context information is below.\n\
         ---------------------\n\
         {}\
         ---------------------\n\
         Given the context information and not prior knowledge, \
         answer the query.\n\
         Query: {}\n\
         Answer: ",
        context, question
    )
}
