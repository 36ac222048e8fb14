use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::prompt::{Category, Language};
use crate::models::saved_prompt::SavedPrompt;
use crate::session::state::SessionSnapshot;
use crate::session::{FrameworkSummary, ToggleOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFrameworkRequest {
    pub framework_id: String,
}

#[derive(Deserialize)]
pub struct SelectCategoryRequest {
    pub category: Category,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Deserialize)]
pub struct TextUpdate {
    #[serde(default)]
    pub value: String,
}

#[derive(Deserialize, Default)]
pub struct SaveRequest {
    pub name: Option<String>,
    pub notes: Option<String>,
}

/// Without parameters the session's own category, search and language apply.
#[derive(Deserialize)]
pub struct FrameworksQuery {
    pub category: Option<Category>,
    pub q: Option<String>,
    pub language: Option<Language>,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub outcome: ToggleOutcome,
    pub session: SessionSnapshot,
}

#[derive(Serialize)]
pub struct CopyResponse {
    pub text: String,
}

/// GET /api/v1/frameworks
pub async fn handle_list_frameworks(
    State(state): State<AppState>,
    Query(params): Query<FrameworksQuery>,
) -> Json<Vec<FrameworkSummary>> {
    let session = &state.session;
    if params.category.is_none() && params.q.is_none() && params.language.is_none() {
        return Json(session.visible_frameworks().await);
    }
    let current = session.snapshot();
    Json(session.frameworks_for(
        params.category.unwrap_or(current.category),
        params.q.as_deref().unwrap_or(""),
        params.language.unwrap_or(current.language),
    ))
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

/// POST /api/v1/session/framework
pub async fn handle_select_framework(
    State(state): State<AppState>,
    Json(req): Json<SelectFrameworkRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.select_framework(&req.framework_id).await?))
}

/// POST /api/v1/session/category
pub async fn handle_select_category(
    State(state): State<AppState>,
    Json(req): Json<SelectCategoryRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.select_category(req.category).await?))
}

/// POST /api/v1/session/search
pub async fn handle_set_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.set_search(&req.query).await?))
}

/// PATCH /api/v1/session/fields/:field_id
pub async fn handle_update_field(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
    Json(req): Json<TextUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.update_field(&field_id, &req.value).await?))
}

/// PATCH /api/v1/session/free-text
pub async fn handle_update_free_text(
    State(state): State<AppState>,
    Json(req): Json<TextUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.update_free_text(&req.value).await?))
}

/// PATCH /api/v1/session/goal
pub async fn handle_update_goal(
    State(state): State<AppState>,
    Json(req): Json<TextUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.update_goal(&req.value).await?))
}

/// POST /api/v1/session/reset
pub async fn handle_reset_fields(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.reset_fields().await?))
}

/// POST /api/v1/session/language/toggle
pub async fn handle_toggle_language(
    State(state): State<AppState>,
) -> Result<Json<ToggleResponse>, AppError> {
    let outcome = state.session.toggle_language().await?;
    Ok(Json(ToggleResponse {
        outcome,
        session: state.session.snapshot(),
    }))
}

/// POST /api/v1/session/copy
pub async fn handle_copy(State(state): State<AppState>) -> Result<Json<CopyResponse>, AppError> {
    let text = state.session.mark_copied().await?;
    Ok(Json(CopyResponse { text }))
}

/// POST /api/v1/session/suggestions/:field_id
pub async fn handle_request_suggestions(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.request_suggestions(&field_id).await?))
}

/// POST /api/v1/session/feedback
pub async fn handle_request_feedback(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.request_feedback().await?))
}

/// POST /api/v1/session/analysis
pub async fn handle_request_analysis(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.request_analysis().await?))
}

/// POST /api/v1/session/save
pub async fn handle_save(
    State(state): State<AppState>,
    body: Option<Json<SaveRequest>>,
) -> Result<Json<SavedPrompt>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let saved = state
        .session
        .save(req.name.as_deref(), req.notes.as_deref())
        .await?;
    Ok(Json(saved))
}

/// POST /api/v1/session/load/:id
pub async fn handle_load(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.load(id).await?))
}
