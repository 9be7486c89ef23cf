//! Advisory adapters for the khata engine.
//!
//! [`GeminiAdvisor`] talks to the Gemini `generateContent` API.
//! [`build_advisor`] picks the adapter for a host from its settings.

use std::sync::Arc;

use async_trait::async_trait;
use khata_engine::{AdvisorSettings, Advisor, AdvisoryError, AdvisoryRequest};

pub use gemini::GeminiAdvisor;

mod gemini;

/// Advisor used when no API key is configured. Every request fails, which
/// the session reports as "advisory unavailable".
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAdvisor;

#[async_trait]
impl Advisor for DisabledAdvisor {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn advise(&self, _request: &AdvisoryRequest) -> Result<String, AdvisoryError> {
        Err(AdvisoryError::MissingApiKey)
    }
}

/// Build the advisor described by `settings`.
///
/// Falls back to [`DisabledAdvisor`] when the Gemini client cannot be built
/// (no API key, broken TLS setup).
pub fn build_advisor(settings: &AdvisorSettings) -> Arc<dyn Advisor> {
    match GeminiAdvisor::from_settings(settings) {
        Ok(advisor) => {
            tracing::info!(model = advisor.model(), "gemini advisor initialized");
            Arc::new(advisor)
        }
        Err(err) => {
            tracing::warn!("advice disabled: {err}");
            Arc::new(DisabledAdvisor)
        }
    }
}

#[cfg(test)]
mod tests {
    use khata_engine::Language;

    use super::*;

    #[tokio::test]
    async fn missing_key_builds_disabled_advisor() {
        let settings = AdvisorSettings {
            api_key: Some(String::new()),
            ..AdvisorSettings::default()
        };
        let advisor = build_advisor(&settings);
        // A key in the environment takes over from the blank configured one.
        let expected = if settings.resolve_api_key().is_some() { "gemini" } else { "disabled" };
        assert_eq!(advisor.name(), expected);

        let advisor = DisabledAdvisor;
        let request = AdvisoryRequest::new(Vec::new(), Language::En);
        assert_eq!(
            advisor.advise(&request).await,
            Err(AdvisoryError::MissingApiKey)
        );
    }

    #[test]
    fn configured_key_builds_gemini() {
        let settings = AdvisorSettings {
            api_key: Some("secret".to_string()),
            ..AdvisorSettings::default()
        };
        assert_eq!(build_advisor(&settings).name(), "gemini");
    }
}
