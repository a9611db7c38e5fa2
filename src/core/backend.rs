//! Text-generation backend: one synchronous completion per call.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const GENERATE_URL: &str = "https://api.cohere.ai/v1/generate";
pub const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Cohere API key is missing. Please configure it in 'config.json'.")]
    MissingCredential,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub trait GenerationBackend: Send + Sync {
    /// `false` when no credential is configured and callers should use their
    /// offline substitute instead of calling [`generate`](Self::generate).
    fn is_configured(&self) -> bool {
        true
    }

    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, BackendError>;
}

// ── Offline ───────────────────────────────────────────────────────────────────

/// Stand-in used when there is no API key.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

impl GenerationBackend for OfflineBackend {
    fn is_configured(&self) -> bool {
        false
    }

    fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, BackendError> {
        Err(BackendError::MissingCredential)
    }
}

// ── Cohere ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    return_likelihoods: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    generations: Vec<Generation>,
}

#[derive(Deserialize)]
struct Generation {
    text: String,
}

pub struct CohereClient {
    api_key: String,
    url: String,
    http: reqwest::blocking::Client,
}

impl CohereClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, BackendError> {
        Self::with_url(api_key, GENERATE_URL)
    }

    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Result<Self, BackendError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into(),
            url: url.into(),
            http,
        })
    }
}

impl GenerationBackend for CohereClient {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, BackendError> {
        let request = GenerateRequest {
            prompt,
            max_tokens,
            temperature: TEMPERATURE,
            return_likelihoods: "NONE",
        };
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_generate_response(&body)
    }
}

/// Pulls the first generation's text out of a response body.
pub fn parse_generate_response(body: &str) -> Result<String, BackendError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Malformed(e.to_string()))?;
    parsed
        .generations
        .into_iter()
        .next()
        .map(|g| g.text)
        .ok_or_else(|| BackendError::Malformed("no generations returned".to_string()))
}

/// Builds the backend for an optional API key. A client that cannot be
/// constructed degrades to offline.
pub fn backend_for(api_key: Option<&str>) -> Arc<dyn GenerationBackend> {
    match api_key {
        Some(key) => match CohereClient::new(key) {
            Ok(client) => {
                log::info!("online generation enabled");
                Arc::new(client)
            }
            Err(err) => {
                log::warn!("could not build HTTP client ({err}); running offline");
                Arc::new(OfflineBackend)
            }
        },
        None => {
            log::info!("no API key configured; running offline");
            Arc::new(OfflineBackend)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Replays canned replies and records every prompt it was given.
    pub struct ScriptedBackend {
        replies: Mutex<Vec<Result<String, BackendError>>>,
        pub prompts: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedBackend {
        pub fn new(replies: Vec<Result<String, BackendError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl GenerationBackend for ScriptedBackend {
        fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, BackendError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), max_tokens));
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(BackendError::Transport("no scripted reply".into()));
            }
            replies.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_generation_is_returned() {
        let body = r#"{"id":"x","generations":[{"id":"g1","text":" Hello there."},{"id":"g2","text":"ignored"}]}"#;
        assert_eq!(parse_generate_response(body).unwrap(), " Hello there.");
    }

    #[test]
    fn empty_or_malformed_bodies_are_errors() {
        assert!(matches!(
            parse_generate_response(r#"{"generations":[]}"#),
            Err(BackendError::Malformed(_))
        ));
        assert!(matches!(
            parse_generate_response("<html>bad gateway</html>"),
            Err(BackendError::Malformed(_))
        ));
    }

    #[test]
    fn request_body_has_fixed_sampling() {
        let request = GenerateRequest {
            prompt: "hi",
            max_tokens: 300,
            temperature: TEMPERATURE,
            return_likelihoods: "NONE",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["prompt"], "hi");
        assert_eq!(value["max_tokens"], 300);
        assert_eq!(value["return_likelihoods"], "NONE");
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn missing_key_yields_offline_backend() {
        let backend = backend_for(None);
        assert!(!backend.is_configured());
        assert_eq!(
            backend.generate("x", 10),
            Err(BackendError::MissingCredential)
        );
    }

    #[test]
    fn unreachable_service_is_a_transport_error() {
        let client = CohereClient::with_url("key", "http://127.0.0.1:9/v1/generate").unwrap();
        assert!(matches!(
            client.generate("hello", 5),
            Err(BackendError::Transport(_))
        ));
    }
}
