use async_trait::async_trait;
use fraud_engine::{AnalyzerError, DocumentAnalysis, DocumentAnalysisBackend};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::json::parse_json_reply;

pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const DOCUMENT_ANALYSIS_PROMPT: &str = r#"You are an insurance document forensics assistant. Examine the attached claim document image.

DETERMINE:
- Whether the document appears authentic
- Whether there are explicit signs of tampering (edited text, cloned regions, inconsistent fonts, mismatched metadata)
- How confident you are, between 0.0 and 1.0
- Short descriptive tags for what you see

Respond ONLY with this JSON:
{
  "is_authentic": true,
  "tampering_detected": false,
  "confidence": 0.0,
  "tags": ["..."]
}
"#;

const MAX_TOKENS: u32 = 500;

/// Document authenticity through a vision model on OpenRouter
pub struct VisionDocumentBackend {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl VisionDocumentBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: OPENROUTER_CHAT_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn call(&self, content: Vec<Value>) -> Result<String, AnalyzerError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": content
                }
            ],
            "max_tokens": MAX_TOKENS
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AnalyzerError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalyzerError::Backend(format!(
                "Vision API request failed: {}",
                response.status()
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| AnalyzerError::InvalidResponse(e.to_string()))?;

        response_json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AnalyzerError::InvalidResponse("Invalid response format from LLM".to_string()))
    }
}

#[async_trait]
impl DocumentAnalysisBackend for VisionDocumentBackend {
    async fn analyze(&self, locator: &str) -> Result<DocumentAnalysis, AnalyzerError> {
        let content = vec![
            json!({
                "type": "text",
                "text": DOCUMENT_ANALYSIS_PROMPT
            }),
            json!({
                "type": "image_url",
                "image_url": {
                    "url": locator
                }
            }),
        ];

        let reply = self.call(content).await?;
        debug!(model = %self.model, reply_length = reply.len(), "Vision reply received");
        parse_json_reply(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};

    /// Serve a canned chat-completions reply on a random local port
    async fn fake_openrouter(status: StatusCode, reply: Value) -> String {
        let app = Router::new().route("/chat", post(move || async move { (status, Json(reply)) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/chat", addr)
    }

    fn completion(content: &str) -> Value {
        json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    #[tokio::test]
    async fn parses_vision_judgment() {
        let endpoint = fake_openrouter(
            StatusCode::OK,
            completion(
                "```json\n{\"is_authentic\": false, \"tampering_detected\": true, \"confidence\": 0.81, \"tags\": [\"invoice\", \"edited total\"]}\n```",
            ),
        )
        .await;
        let backend = VisionDocumentBackend::new("sk-test", "vision-model").with_endpoint(endpoint);

        let analysis = backend.analyze("https://docs.example.com/invoice.png").await.unwrap();
        assert!(!analysis.is_authentic);
        assert!(analysis.tampering_detected);
        assert_eq!(analysis.confidence, 0.81);
        assert_eq!(analysis.tags, vec!["invoice", "edited total"]);
    }

    #[tokio::test]
    async fn http_error_is_backend_failure() {
        let endpoint = fake_openrouter(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})).await;
        let backend = VisionDocumentBackend::new("sk-test", "vision-model").with_endpoint(endpoint);

        let err = backend.analyze("https://docs.example.com/a.png").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Backend(_)));
    }

    #[tokio::test]
    async fn unexpected_shape_is_invalid_response() {
        let endpoint = fake_openrouter(StatusCode::OK, json!({"choices": []})).await;
        let backend = VisionDocumentBackend::new("sk-test", "vision-model").with_endpoint(endpoint);

        let err = backend.analyze("https://docs.example.com/a.png").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidResponse(_)));
    }
}
