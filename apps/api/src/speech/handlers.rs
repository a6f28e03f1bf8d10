use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::llm_client::AudioClip;
use crate::models::feedback::Transcription;
use crate::speech;
use crate::state::AppState;

const AUDIO_FIELD: &str = "audio";

/// POST /api/transcribe-audio
///
/// Multipart upload with the recording in the `audio` field.
pub async fn handle_transcribe_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Transcription>, AppError> {
    let transcriber = state.transcriber()?;
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!(error = %e, "unreadable multipart body");
        AppError::validation("Failed to parse form data")
    })?;

    let clip = read_audio_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::validation("Audio file is required"))?;

    let transcription = speech::transcribe(transcriber, clip).await?;
    Ok(Json(transcription))
}

async fn read_audio_field(multipart: &mut Multipart) -> Result<Option<AudioClip>, AppError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(form_error(e.status())),
        };
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("audio.webm").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| form_error(e.status()))?;

        return Ok(Some(AudioClip {
            file_name,
            content_type,
            bytes,
        }));
    }
}

fn form_error(status: StatusCode) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation("Audio file is too large. Maximum size is 25MB.")
    } else {
        AppError::validation("Failed to parse form data")
    }
}
