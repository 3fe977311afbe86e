//! Google Gemini `generateContent` client

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{snippet, ClassificationError, VisionModel};
use crate::config::GeminiConfig;

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout_seconds: u64,
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    InlineData(InlineData),
    Text(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentRequest {
    pub fn new(image: &[u8], mime_type: &str, prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData(InlineData {
                        mime_type: mime_type.to_string(),
                        data: STANDARD.encode(image),
                    }),
                    Part::Text(prompt.to_string()),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: 0.2,
            },
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

impl GeminiClient {
    /// Create new Gemini client
    pub fn new(config: &GeminiConfig) -> Result<Self, ClassificationError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClassificationError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.api_base.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> ClassificationError {
        if err.is_timeout() {
            ClassificationError::Timeout(self.timeout_seconds)
        } else {
            ClassificationError::Network(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl VisionModel for GeminiClient {
    async fn generate(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ClassificationError> {
        let request = GenerateContentRequest::new(image, mime_type, prompt);

        let response = self.http_client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            tracing::error!("Gemini request failed ({}): {}", status, snippet(&body));
            return Err(ClassificationError::Api {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ClassificationError::invalid(format!("unexpected Gemini envelope: {}", e), &body))?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(ClassificationError::invalid("empty model response", &body));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest::new(b"abc", "image/jpeg", "classify");
        let value = serde_json::to_value(&request).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "YWJj");
        assert_eq!(parts[1]["text"], "classify");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text(), "{\"a\":1}");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = GeminiConfig {
            api_key: "k".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_base: "https://example.test/v1beta/".to_string(),
            timeout_seconds: 5,
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.endpoint, "https://example.test/v1beta/models/gemini-2.5-flash:generateContent");
    }
}
