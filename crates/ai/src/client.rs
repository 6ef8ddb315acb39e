//! Gemini-style text-generation client.
//!
//! One request/response shape: a system instruction plus a user prompt go
//! in, the first candidate's text comes out. Anything beyond that (chat
//! history, tools, streaming) is out of scope for this application.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AiError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

// ============================================================================
// Request/response structures
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: ContentPayload,
    contents: Vec<ContentPayload>,
}

#[derive(Debug, Serialize)]
struct ContentPayload {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<VendorError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VendorError {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for a Gemini-style generateContent endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Send one generation request and return the completion verbatim.
    pub async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, AiError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            BASE_URL, self.model, self.api_key
        );

        let request = GenerateRequest {
            system_instruction: ContentPayload {
                parts: vec![TextPart {
                    text: system_instruction.to_string(),
                }],
            },
            contents: vec![ContentPayload {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("generation request to model '{}'", self.model);

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error details ride in the body when the vendor provides them
            return Err(Self::parse_completion(&body)
                .err()
                .unwrap_or(AiError::Vendor {
                    message: format!("HTTP {status}"),
                }));
        }

        Self::parse_completion(&body)
    }

    fn parse_completion(body: &str) -> Result<String, AiError> {
        let response: GenerateResponse =
            serde_json::from_str(body).map_err(|_| AiError::EmptyResponse)?;

        if let Some(error) = response.error {
            return Err(AiError::Vendor {
                message: error.message,
            });
        }

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| {
                content
                    .parts
                    .into_iter()
                    .find_map(|part| part.text.filter(|t| !t.trim().is_empty()))
            });

        text.ok_or(AiError::EmptyResponse)
    }
}
