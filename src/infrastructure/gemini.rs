//! Gemini `generateContent` client.
//!
//! Sends the instruction and the PNG as one multimodal user message and
//! returns the generated text untouched.

use std::fs;
use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::application::MarkdownConverter;
use crate::domain::{AppError, Credential, GeminiConfig, Result};

/// MIME type of clipboard captures.
const IMAGE_MIME_TYPE: &str = "image/png";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'static str,
    data: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Blocking Gemini client.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    /// Returns an API error if the HTTP client cannot be initialised.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Api {
                message: format!("Failed to initialise HTTP client: {e}"),
            })?;

        Ok(Self { http, config })
    }
}

impl MarkdownConverter for GeminiClient {
    fn convert(&self, image: &Path, credential: &Credential) -> Result<String> {
        let bytes = fs::read(image)
            .map_err(|e| AppError::io(format!("Failed to read {}", image.display()), e))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let body = build_request(&self.config.system_prompt, &encoded);
        let url = self.config.generate_url();

        tracing::info!(model = %self.config.model, bytes = bytes.len(), "Sending image to Gemini");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, credential.expose())
            .json(&body)
            .send()
            .map_err(AppError::from_transport)?;

        let status = response.status();
        let text = response.text().map_err(AppError::from_transport)?;

        if !status.is_success() {
            return Err(AppError::Api {
                message: describe_error(status, &text),
            });
        }

        extract_text(&text)
    }
}

fn build_request<'a>(prompt: &'a str, encoded_image: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: IMAGE_MIME_TYPE,
                        data: encoded_image,
                    },
                },
            ],
        }],
    }
}

/// Concatenated text parts of the first candidate.
fn extract_text(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| AppError::Api {
        message: format!("Unexpected response: {e}"),
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AppError::Api {
            message: "response contained no text".into(),
        });
    }

    Ok(text)
}

/// Human-readable summary of an error response.
fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => match envelope.error.status {
            Some(code) => format!("{} ({code})", envelope.error.message),
            None => envelope.error.message,
        },
        _ => format!("HTTP {status}"),
    }
}
