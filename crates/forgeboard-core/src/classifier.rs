//! External text-classification capability.
//!
//! The insight pipeline receives a [`Classifier`] rather than an HTTP
//! client: the trait is the narrow seam, [`GeminiClassifier`] the concrete
//! generateContent-speaking implementation. Every failure mode here —
//! transport error, timeout, non-2xx status, empty candidate list — is
//! represented as a [`ClassifierError`] so the pipeline can absorb it.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Transport(String),

    #[error("classifier returned HTTP {0}")]
    Status(u16),

    #[error("classifier response carried no text content")]
    EmptyResponse,
}

/// Narrow capability: one synchronous prompt-in, raw-text-out call.
pub trait Classifier: Send + Sync {
    fn classify(&self, prompt: &str) -> Result<String, ClassifierError>;
}

// ---------------------------------------------------------------------------
// GeminiClassifier
// ---------------------------------------------------------------------------

/// Default generateContent endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// HTTP client for a Gemini-style generateContent endpoint.
///
/// The request timeout is mandatory: an in-flight call that exceeds it
/// surfaces as `Transport`, which the pipeline routes to its fallback
/// instead of leaving the invocation pending.
pub struct GeminiClassifier {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClassifier {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

impl Classifier for GeminiClassifier {
    fn classify(&self, prompt: &str) -> Result<String, ClassifierError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let payload: serde_json::Value = response
            .json()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or(ClassifierError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
