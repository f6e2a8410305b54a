// SPDX-License-Identifier: MIT

//! Advisory text generation for SPPD result summaries.
//!
//! Thin client over a generative-text endpoint, used only to pre-fill the
//! free-text report field. It can never fail the submission flow: missing
//! key, network error, or an empty response all fall back to a
//! deterministic template.

use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Generates a short formal duty-travel summary.
#[derive(Clone)]
pub struct AdvisoryService {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl AdvisoryService {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    /// Produce an advisory summary. Always returns text.
    pub async fn generate(&self, destination: &str, activity_type: &str, duration: &str) -> String {
        let Some(key) = self.api_key.as_deref() else {
            return fallback_summary(destination, activity_type, duration);
        };

        match self
            .request_summary(key, destination, activity_type, duration)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("Advisory backend returned empty text; using fallback");
                fallback_summary(destination, activity_type, duration)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Advisory backend failed; using fallback");
                fallback_summary(destination, activity_type, duration)
            }
        }
    }

    async fn request_summary(
        &self,
        key: &str,
        destination: &str,
        activity_type: &str,
        duration: &str,
    ) -> Result<String, anyhow::Error> {
        let prompt = format!(
            "Write a short formal duty-travel (SPPD) report for a teacher.\n\
             Activity: {activity_type}\n\
             Location: {destination}\n\
             Duration: {duration}\n\
             Respond with 3-4 polite sentences."
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(format!("{}?key={}", self.api_url, key))
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        Ok(text)
    }
}

/// Deterministic template used whenever the backend is unavailable.
fn fallback_summary(destination: &str, activity_type: &str, duration: &str) -> String {
    format!(
        "Duty travel report:\n\n\
         Carried out {activity_type} at {destination} over {duration}. \
         The activity proceeded as planned and met its stated objectives."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_uses_deterministic_fallback() {
        let service = AdvisoryService::new("http://unused.invalid".to_string(), None);
        let first = service
            .generate("Dinas Pendidikan Serang", "Workshop", "2024-05-01 to 2024-05-03")
            .await;
        let second = service
            .generate("Dinas Pendidikan Serang", "Workshop", "2024-05-01 to 2024-05-03")
            .await;

        assert_eq!(first, second);
        assert!(first.contains("Workshop"));
        assert!(first.contains("Dinas Pendidikan Serang"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back() {
        let service = AdvisoryService::new(
            "http://127.0.0.1:1/generate".to_string(),
            Some("test-key".to_string()),
        );
        let text = service.generate("Serang", "Rapat MKKS", "one day").await;
        assert!(text.contains("Rapat MKKS"));
    }
}
