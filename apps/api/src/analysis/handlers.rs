//! Axum route handlers for uploading resumes and reading review history.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::Feedback;
use crate::analysis::pipeline::{review_resume, ReviewStatus};
use crate::analysis::records::{
    get_resume_history, insert_resume_record, HistoryEntry, NewResumeRecord,
};
use crate::auth::session::SessionUser;
use crate::errors::AppError;
use crate::extraction::{extract_text, UploadedDocument};
use crate::state::AppState;

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume_id: Uuid,
    pub filename: String,
    pub status: ReviewStatus,
    pub score: i32,
    pub score_degrees: f64,
    pub feedback: Feedback,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub resumes: Vec<HistoryEntry>,
}

/// POST /upload
///
/// Full pipeline: spool upload → extract text → gate → generate → parse → persist.
/// Rejections and generation failures are stored and returned with score 0.
pub async fn handle_upload(
    State(state): State<AppState>,
    user: SessionUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let document = read_document(multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file selected.".to_string()))?;
    info!(
        "User {} uploaded '{}' ({} bytes)",
        user.username,
        document.filename,
        document.bytes.len()
    );

    let spooled = document
        .spool()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to spool upload: {e}")))?;
    let text = extract_text(spooled.path()).await;
    drop(spooled);

    let outcome = review_resume(&text, state.generator.as_ref(), state.parser.as_ref()).await;

    let row = insert_resume_record(
        &state.db,
        NewResumeRecord {
            user_id: user.user_id,
            filename: &document.filename,
            content: &text,
            score: outcome.score,
            feedback: &outcome.feedback,
        },
    )
    .await?;

    Ok(Json(UploadResponse {
        resume_id: row.id,
        filename: row.filename,
        status: outcome.status,
        score: outcome.score,
        score_degrees: outcome.score_degrees,
        feedback: outcome.feedback,
        message: outcome.message,
    }))
}

/// GET /profile
///
/// The user's review history, newest first.
pub async fn handle_profile(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let resumes = get_resume_history(&state.db, user.user_id).await?;
    Ok(Json(ProfileResponse {
        username: user.username,
        resumes,
    }))
}

/// Pulls the `resume` file out of the form. `None` when the field is absent or
/// was submitted without choosing a file.
async fn read_document(mut multipart: Multipart) -> Result<Option<UploadedDocument>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(|name| name.trim().to_string())
            .unwrap_or_default();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

        if filename.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadedDocument { filename, bytes }));
    }
    Ok(None)
}
