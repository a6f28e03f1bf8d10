use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    error_body, join_url, Content, GenerateRequest, GenerationConfig, GenerativeModel, LlmError,
};

const PROVIDER: &str = "Gemini";

/// Fast, cheap model used for feedback and task generation.
pub const FLASH_LITE_001: &str = "gemini-2.0-flash-lite-001";
/// Alias used for the main language-assistance answer.
pub const FLASH_LITE: &str = "gemini-2.0-flash-lite";
/// Used for follow-ups and the meta (title/suggestions) call.
pub const FLASH_LATEST: &str = "gemini-1.5-flash-latest";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: &'a [Content],
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
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

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Result<String, LlmError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyContent { provider: PROVIDER })?;

        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(LlmError::InvalidFormat { provider: PROVIDER })
    }
}

/// REST client for the Generative Language `generateContent` endpoint.
/// The API key travels as a query parameter.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let url = join_url(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", request.model),
        );
        let body = GenerateContentBody {
            contents: &request.contents,
            generation_config: request.config,
        };

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message: error_body(response).await,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        debug!(
            model = request.model,
            candidates = parsed.candidates.len(),
            "Gemini response received"
        );
        parsed.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<String, LlmError> {
        serde_json::from_str::<GenerateContentResponse>(json)
            .unwrap()
            .into_text()
    }

    #[test]
    fn test_first_candidate_text_is_returned() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"ignored"}]}}]}"#;
        assert_eq!(decode(json).unwrap(), "hello");
    }

    #[test]
    fn test_missing_candidates_is_empty_response() {
        let err = decode(r#"{}"#).unwrap_err();
        assert_eq!(err.to_string(), "Empty response from Gemini API");
    }

    #[test]
    fn test_missing_parts_is_invalid_format() {
        let err = decode(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid response format from Gemini API");
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest::prompt(FLASH_LITE_001, "check this", 0.2, 1024);
        let body = GenerateContentBody {
            contents: &request.contents,
            generation_config: request.config,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "check this");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
    }
}
