//! Gemini `generateContent` backend (blocking)

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use ureq::Agent;

use fuellog_types::{Error, Result};

use super::VisionBackend;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiBackend {
    agent: Agent,
    api_key: String,
    model: String,
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
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.model = model;
        }
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(prompt: &str, image: &[u8], mime_type: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "inline_data": { "mime_type": mime_type, "data": STANDARD.encode(image) } }
                ]
            }],
            "generationConfig": { "responseMimeType": "application/json" }
        })
    }
}

impl VisionBackend for GeminiBackend {
    fn analyze(&self, prompt: &str, image: &[u8], mime_type: &str) -> Result<String> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Vision("no API key configured".to_string()));
        }

        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        debug!(model = %self.model, "calling vision model");

        let body = Self::request_body(prompt, image, mime_type);
        let mut response = match self
            .agent
            .post(url.as_str())
            .query("key", &self.api_key)
            .send_json(&body)
        {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(status)) => {
                return Err(Error::Vision(format!("model API returned status {}", status)));
            }
            Err(e) => return Err(Error::Vision(format!("network error: {}", e))),
        };

        let parsed: GenerateResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| Error::Vision(format!("failed to parse response: {}", e)))?;

        first_text(parsed).ok_or_else(|| Error::Vision("model returned no text".to_string()))
    }
}

fn first_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_inlines_image() {
        let body = GeminiBackend::request_body("read it", b"abc", "image/png");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "read it");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "YWJj");
    }

    #[test]
    fn test_first_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"type\":\"unknown\"}"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_text(parsed).as_deref(), Some("{\"type\":\"unknown\"}"));

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_text(empty), None);
    }

    #[test]
    fn test_missing_key_fails_before_network() {
        let backend = GeminiBackend::new("", Duration::from_secs(1));
        assert!(matches!(
            backend.analyze("p", b"x", "image/png"),
            Err(Error::Vision(_))
        ));
    }

    #[test]
    fn test_blank_model_keeps_default() {
        let backend = GeminiBackend::new("k", Duration::from_secs(1)).with_model(Some(" ".into()));
        assert_eq!(backend.model(), DEFAULT_MODEL);
    }
}
