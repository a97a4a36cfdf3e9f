//! Axum route handlers for the CV API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::content_selector::SelectionResult;
use crate::generation::generator::{generate_cv, prepare, GenerateCvRequest, GenerateCvResponse};
use crate::generation::jd_parser::ExtractedSignals;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SelectionPreviewResponse {
    pub signals: ExtractedSignals,
    pub selection: SelectionResult,
}

/// POST /api/v1/cv
///
/// Runs the full pipeline and returns the document URL with the payload.
pub async fn handle_generate_cv(
    State(state): State<AppState>,
    Json(request): Json<GenerateCvRequest>,
) -> Result<Json<GenerateCvResponse>, AppError> {
    let response = generate_cv(
        state.store.as_ref(),
        state.llm.as_ref(),
        &state.scraper,
        request,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/cv/selection
///
/// Signal extraction and content selection only. No LLM call, nothing written.
pub async fn handle_preview_selection(
    State(state): State<AppState>,
    Json(request): Json<GenerateCvRequest>,
) -> Result<Json<SelectionPreviewResponse>, AppError> {
    let run = prepare(state.store.as_ref(), &state.scraper, &request).await?;
    Ok(Json(SelectionPreviewResponse {
        signals: run.signals,
        selection: run.selection,
    }))
}
