//! Speech-to-text for spoken practice answers.

pub mod handlers;

use tracing::{error, info};

use crate::errors::AppError;
use crate::llm_client::whisper::MAX_AUDIO_BYTES;
use crate::llm_client::{AudioClip, Transcriber};
use crate::models::feedback::Transcription;

/// Request body ceiling for the upload route. Above the audio limit so that
/// an oversized file reaches the size check instead of a bare 413.
pub const UPLOAD_BODY_LIMIT: usize = MAX_AUDIO_BYTES + 1024 * 1024;

pub fn check_size(clip: &AudioClip) -> Result<(), AppError> {
    if clip.bytes.len() > MAX_AUDIO_BYTES {
        return Err(AppError::validation(
            "Audio file is too large. Maximum size is 25MB.",
        ));
    }
    Ok(())
}

/// No fallback transcript: any upstream failure fails the request.
pub async fn transcribe(
    transcriber: &dyn Transcriber,
    clip: AudioClip,
) -> Result<Transcription, AppError> {
    check_size(&clip)?;
    info!(
        file = %clip.file_name,
        bytes = clip.bytes.len(),
        "transcribing audio"
    );

    match transcriber.transcribe(clip).await {
        Ok(transcription) => Ok(Transcription { transcription }),
        Err(err) => {
            error!(error = %err, "transcription failed");
            Err(AppError::Llm(format!("Transcription failed: {err}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedTranscriber;
    use bytes::Bytes;

    fn clip(len: usize) -> AudioClip {
        AudioClip {
            file_name: "answer.webm".into(),
            content_type: Some("audio/webm".into()),
            bytes: Bytes::from(vec![0u8; len]),
        }
    }

    #[tokio::test]
    async fn test_transcribe_success() {
        let transcriber = ScriptedTranscriber::new(vec![Ok("I live in Berlin.")]);
        let out = transcribe(transcriber.as_ref(), clip(16)).await.unwrap();
        assert_eq!(out.transcription, "I live in Berlin.");
        assert_eq!(transcriber.clips.lock().unwrap()[0].file_name, "answer.webm");
    }

    #[tokio::test]
    async fn test_oversized_clip_never_uploaded() {
        let transcriber = ScriptedTranscriber::new(vec![Ok("unused")]);
        let err = transcribe(transcriber.as_ref(), clip(MAX_AUDIO_BYTES + 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(transcriber.clips.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_prefixed() {
        let transcriber = ScriptedTranscriber::new(vec![Err("invalid file format")]);
        let err = transcribe(transcriber.as_ref(), clip(8)).await.unwrap_err();
        assert!(err.to_string().starts_with("Transcription failed: OpenAI API error"));
    }
}
