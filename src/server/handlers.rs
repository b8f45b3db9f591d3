use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Serialize;

use crate::models::TranscriptPayload;

use super::{
    AppState, pages,
    response::{ApiError, PageError},
};

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: &'static str,
    pub url: String,
}

pub async fn health() -> Html<&'static str> {
    Html(pages::HEALTH_PAGE)
}

/// POST /api/ticket
pub async fn ingest_ticket(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload = TranscriptPayload::parse(&body)?;
    let url = state.ingest.ingest(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            message: "Transcript saved.",
            url,
        }),
    ))
}

/// GET /:transcript_id
pub async fn view_transcript(
    State(state): State<AppState>,
    Path(transcript_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let page = state.transcripts.render(&transcript_id).await?;
    Ok(Html(page))
}
