use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use tracing::debug;

use super::{error_body, join_url, AudioClip, LlmError, Transcriber};

const PROVIDER: &str = "OpenAI";
pub const WHISPER_MODEL: &str = "whisper-1";
/// Upload ceiling enforced by the transcription API.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Client for `/v1/audio/transcriptions`.
#[derive(Clone)]
pub struct WhisperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WhisperClient {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, LlmError> {
        let size = clip.bytes.len();
        let mut file = Part::bytes(clip.bytes.to_vec()).file_name(clip.file_name);
        if let Some(content_type) = clip.content_type.as_deref() {
            file = file.mime_str(content_type)?;
        }

        let form = Form::new()
            .part("file", file)
            .text("model", WHISPER_MODEL)
            .text("language", "en")
            .text("response_format", "json");

        debug!(bytes = size, "sending audio to Whisper");

        let response = self
            .client
            .post(join_url(&self.base_url, "v1/audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
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

        let parsed: TranscriptionResponse = response.json().await?;
        transcript_text(parsed)
    }
}

fn transcript_text(response: TranscriptionResponse) -> Result<String, LlmError> {
    response
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(LlmError::EmptyContent { provider: PROVIDER })
}
