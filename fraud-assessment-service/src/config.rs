use std::time::Duration;

use anyhow::{anyhow, bail};
use fraud_engine::AssessorConfig;
use fraud_engine::config::DEFAULT_ANALYZER_TIMEOUT;

pub const DEFAULT_TEXT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_VISION_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_PORT: u16 = 3000;

/// Service configuration, read from the environment at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub openrouter_api_key: String,
    pub text_model: String,
    pub vision_model: String,
    pub analyzer_timeout: Duration,
    pub narrative_enabled: bool,
    pub host: String,
    pub port: u16,
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let openrouter_api_key = lookup("OPENROUTER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("OPENROUTER_API_KEY not set"))?;

        let analyzer_timeout = match lookup("ANALYZER_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|e| anyhow!("Invalid ANALYZER_TIMEOUT_SECS {:?}: {}", raw, e))?;
                if secs == 0 {
                    bail!("ANALYZER_TIMEOUT_SECS must be at least 1");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_ANALYZER_TIMEOUT,
        };

        let narrative_enabled = match lookup("NARRATIVE_ENABLED") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow!("Invalid NARRATIVE_ENABLED {:?}: {}", raw, e))?,
            None => true,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow!("Invalid PORT {:?}: {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            openrouter_api_key,
            text_model: lookup("FRAUD_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            vision_model: lookup("FRAUD_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            analyzer_timeout,
            narrative_enabled,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        })
    }

    pub fn assessor_config(&self) -> AssessorConfig {
        AssessorConfig::default()
            .with_analyzer_timeout(self.analyzer_timeout)
            .with_narrative_enabled(self.narrative_enabled)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
