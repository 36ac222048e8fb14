use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::saved_prompt::SavedPrompt;
use crate::state::AppState;
use crate::store::transfer::ImportReport;

const EXPORT_FILENAME: &str = "saved-prompts.json";

/// Either field may be sent alone. A blank `notes` clears the notes.
#[derive(Deserialize)]
pub struct PromptPatch {
    pub name: Option<String>,
    pub notes: Option<String>,
}

/// GET /api/v1/prompts
pub async fn handle_list_prompts(
    State(state): State<AppState>,
) -> Result<Json<Vec<SavedPrompt>>, AppError> {
    Ok(Json(state.session.refresh_saved().await?))
}

/// PATCH /api/v1/prompts/:id
pub async fn handle_update_prompt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PromptPatch>,
) -> Result<Json<SavedPrompt>, AppError> {
    if req.name.is_none() && req.notes.is_none() {
        return Err(AppError::Validation(
            "Nothing to update: send a name or notes".to_string(),
        ));
    }

    let mut updated = None;
    if let Some(name) = req.name {
        updated = Some(state.session.rename(id, &name).await?);
    }
    if let Some(notes) = req.notes {
        updated = Some(state.session.update_notes(id, Some(notes)).await?);
    }
    updated
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Saved prompt {id} not found")))
}

/// DELETE /api/v1/prompts/:id
pub async fn handle_delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.session.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/prompts/export
pub async fn handle_export_prompts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let body = state.session.export_json().await?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// POST /api/v1/prompts/import
///
/// The body is the raw export document; records that fail validation are
/// reported and skipped.
pub async fn handle_import_prompts(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportReport>, AppError> {
    Ok(Json(state.session.import_json(&body).await?))
}
