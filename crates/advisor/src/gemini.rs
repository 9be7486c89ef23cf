//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use khata_engine::{AdvisorSettings, Advisor, AdvisoryError, AdvisoryRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiAdvisor {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::with_client(Client::new(), api_key, model, base_url)
    }

    fn with_client(
        http: Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds a client from settings, with the configured request timeout.
    pub fn from_settings(settings: &AdvisorSettings) -> Result<Self, AdvisoryError> {
        Self::with_key(settings, settings.resolve_api_key())
    }

    fn with_key(settings: &AdvisorSettings, api_key: Option<String>) -> Result<Self, AdvisoryError> {
        let api_key = api_key.ok_or(AdvisoryError::MissingApiKey)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| AdvisoryError::Transport(err.to_string()))?;
        Ok(Self::with_client(
            http,
            api_key,
            &settings.model,
            &settings.base_url,
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateRequest {
    fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
        }
    }
}

impl GenerateResponse {
    /// Text parts of the first candidate, joined. `None` when there is no
    /// text at all.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn advise(&self, request: &AdvisoryRequest) -> Result<String, AdvisoryError> {
        let payload = GenerateRequest::from_prompt(request.prompt());

        let res = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| AdvisoryError::Transport(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let message = res
                .json::<ErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::debug!(status = status.as_u16(), "gemini request rejected: {message}");
            return Err(AdvisoryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        res.json::<GenerateResponse>()
            .await
            .map_err(|err| AdvisoryError::Malformed(err.to_string()))?
            .into_text()
            .ok_or(AdvisoryError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wraps_prompt_as_user_content() {
        let json = serde_json::to_value(GenerateRequest::from_prompt("hello".to_string())).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Aap ko "}, {"text": "Rs. 300 lene hain."}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 12}
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.into_text().as_deref(),
            Some("Aap ko Rs. 300 lene hain.")
        );
    }

    #[test]
    fn response_without_text_is_none() {
        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(blocked.into_text(), None);

        let no_parts: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#).unwrap();
        assert_eq!(no_parts.into_text(), None);

        let blank: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#)
                .unwrap();
        assert_eq!(blank.into_text(), None);
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let advisor = GeminiAdvisor::new("key", "gemini-test", "http://localhost:9/");
        assert_eq!(
            advisor.endpoint(),
            "http://localhost:9/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(advisor.name(), "gemini");
    }

    #[test]
    fn settings_without_key_are_rejected() {
        let settings = AdvisorSettings {
            api_key: Some("   ".to_string()),
            ..AdvisorSettings::default()
        };
        let resolved = settings.resolve_api_key_with(|_| None);
        assert_eq!(
            GeminiAdvisor::with_key(&settings, resolved).unwrap_err(),
            AdvisoryError::MissingApiKey
        );
    }

    #[test]
    fn blank_configured_key_uses_environment_key() {
        let settings = AdvisorSettings {
            api_key: Some("   ".to_string()),
            model: "gemini-test".to_string(),
            ..AdvisorSettings::default()
        };
        let resolved = settings.resolve_api_key_with(|name| {
            (name == "GEMINI_API_KEY").then(|| "env-key".to_string())
        });
        let advisor = GeminiAdvisor::with_key(&settings, resolved).unwrap();
        assert_eq!(advisor.api_key, "env-key");
        assert_eq!(advisor.model(), "gemini-test");
    }
}
