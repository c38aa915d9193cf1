//! Gemini `generateContent` client

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{NameOracle, OracleRequest, RequestKind};
use crate::error::OracleError;
use crate::options::OracleOptions;

/// Connection settings for [`GeminiOracle`]
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub model: String,
    /// `None` when the key variable is unset; requests then fail as unavailable
    pub api_key: Option<String>,
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub endpoint: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Resolve the options, reading the API key from the environment
    pub fn from_options(options: &OracleOptions) -> Self {
        let api_key = std::env::var(&options.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            log::warn!(
                "{} is not set; name normalization will fall back to raw names",
                options.api_key_env
            );
        }

        Self {
            model: options.model.clone(),
            api_key,
            endpoint: options.endpoint.clone(),
            timeout: Duration::from_secs(options.timeout_secs),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

// ============================================================================
// Gemini API types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Oracle backed by a Gemini model, temperature 0
///
/// Each call is one blocking HTTP request bounded by the configured timeout.
/// There are no retries.
#[derive(Debug, Clone)]
pub struct GeminiOracle {
    config: GeminiConfig,
}

impl GeminiOracle {
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl NameOracle for GeminiOracle {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn normalize(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| OracleError::Unavailable("API key not configured".into()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        let user_message = request.user_message();
        let body = build_request_body(request.system_prompt(), &user_message);

        match request.kind {
            RequestKind::Filter => log::debug!(
                "asking {} to filter {} candidate lines",
                self.config.model,
                request.candidates.len()
            ),
            RequestKind::Normalize => log::debug!(
                "asking {} to normalize {} candidates against {} names",
                self.config.model,
                request.candidates.len(),
                request.ground_truth.len()
            ),
        }

        let response = client
            .post(self.config.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(OracleError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                message
            )));
        }

        extract_response_text(&text)
    }
}

fn build_request_body<'a>(system_prompt: &'a str, user_message: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: system_prompt,
            }],
        },
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: user_message }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.0,
            response_mime_type: "text/plain",
        },
    }
}

/// Concatenate the text parts of the first candidate
fn extract_response_text(body: &str) -> Result<String, OracleError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| OracleError::Unparsable(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(OracleError::Unparsable("response has no text".into()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body_shape() {
        let body = build_request_body("system", "user text");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "systemInstruction": { "parts": [{ "text": "system" }] },
                "contents": [{ "role": "user", "parts": [{ "text": "user text" }] }],
                "generationConfig": { "temperature": 0.0, "responseMimeType": "text/plain" }
            })
        );
    }

    #[test]
    fn test_extract_response_text() {
        let body = r#"{
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "```json\n{\"colleges\":" }, { "text": " [\"MIT\"]}\n```" }] },
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(
            extract_response_text(body).unwrap(),
            "```json\n{\"colleges\": [\"MIT\"]}\n```"
        );
    }

    #[test]
    fn test_extract_response_without_text() {
        assert!(matches!(
            extract_response_text(r#"{"candidates": []}"#),
            Err(OracleError::Unparsable(_))
        ));
        assert!(matches!(
            extract_response_text("<html>"),
            Err(OracleError::Unparsable(_))
        ));
    }

    #[test]
    fn test_missing_key_is_unavailable() {
        let oracle = GeminiOracle::new(GeminiConfig {
            model: "gemini-2.5-flash".into(),
            api_key: None,
            endpoint: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(1),
        });
        let request = OracleRequest {
            kind: RequestKind::Normalize,
            ground_truth: vec!["Yale".into()],
            candidates: vec!["Yale".into()],
        };
        assert!(matches!(
            oracle.normalize(&request),
            Err(OracleError::Unavailable(_))
        ));
    }

    #[test]
    fn test_url() {
        let config = GeminiConfig {
            model: "gemini-2.5-flash".into(),
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta/".into(),
            timeout: Duration::from_secs(60),
        };
        assert_eq!(
            config.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
