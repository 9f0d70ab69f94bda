use async_trait::async_trait;
use fraud_engine::prompts::{NARRATIVE_PROMPT, TEXT_ANALYSIS_PROMPT};
use fraud_engine::{AnalyzerError, NarrativeBackend, TextAnalysis, TextAnalysisBackend};
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Prompt,
    providers::openrouter,
};
use tracing::debug;

use super::json::parse_json_reply;

/// Shared OpenRouter client plus the model used for text tasks
#[derive(Clone)]
pub struct LlmClient {
    client: openrouter::Client,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: &str, model: impl Into<String>) -> Self {
        Self {
            client: openrouter::Client::new(api_key),
            model: model.into(),
        }
    }

    pub fn agent(&self, preamble: &str) -> Agent<openrouter::CompletionModel> {
        self.client.agent(&self.model).preamble(preamble).build()
    }

    async fn prompt(&self, preamble: &str, prompt: &str) -> Result<String, AnalyzerError> {
        let agent = self.agent(preamble);
        let reply = agent
            .prompt(prompt.to_string())
            .await
            .map_err(|e| AnalyzerError::Backend(e.to_string()))?;
        debug!(model = %self.model, reply_length = reply.len(), "LLM reply received");
        Ok(reply)
    }
}

/// Text consistency analysis through an LLM agent
pub struct LlmTextBackend {
    llm: LlmClient,
}

impl LlmTextBackend {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TextAnalysisBackend for LlmTextBackend {
    async fn analyze(&self, prompt: &str) -> Result<TextAnalysis, AnalyzerError> {
        let reply = self.llm.prompt(TEXT_ANALYSIS_PROMPT, prompt).await?;
        parse_json_reply(&reply)
    }
}

/// Assessment narrative through an LLM agent
pub struct LlmNarrativeBackend {
    llm: LlmClient,
}

impl LlmNarrativeBackend {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl NarrativeBackend for LlmNarrativeBackend {
    async fn generate(&self, prompt: &str) -> Result<String, AnalyzerError> {
        self.llm.prompt(NARRATIVE_PROMPT, prompt).await
    }
}
