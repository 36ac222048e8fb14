pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;
use crate::store::handlers as prompts;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/frameworks", get(handlers::handle_list_frameworks))
        // Session commands
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route(
            "/api/v1/session/framework",
            post(handlers::handle_select_framework),
        )
        .route(
            "/api/v1/session/category",
            post(handlers::handle_select_category),
        )
        .route("/api/v1/session/search", post(handlers::handle_set_search))
        .route(
            "/api/v1/session/fields/:field_id",
            patch(handlers::handle_update_field),
        )
        .route(
            "/api/v1/session/free-text",
            patch(handlers::handle_update_free_text),
        )
        .route("/api/v1/session/goal", patch(handlers::handle_update_goal))
        .route("/api/v1/session/reset", post(handlers::handle_reset_fields))
        .route(
            "/api/v1/session/language/toggle",
            post(handlers::handle_toggle_language),
        )
        .route("/api/v1/session/copy", post(handlers::handle_copy))
        .route(
            "/api/v1/session/suggestions/:field_id",
            post(handlers::handle_request_suggestions),
        )
        .route(
            "/api/v1/session/feedback",
            post(handlers::handle_request_feedback),
        )
        .route(
            "/api/v1/session/analysis",
            post(handlers::handle_request_analysis),
        )
        .route("/api/v1/session/save", post(handlers::handle_save))
        .route("/api/v1/session/load/:id", post(handlers::handle_load))
        // Saved prompts
        .route("/api/v1/prompts", get(prompts::handle_list_prompts))
        .route(
            "/api/v1/prompts/export",
            get(prompts::handle_export_prompts),
        )
        .route(
            "/api/v1/prompts/import",
            post(prompts::handle_import_prompts),
        )
        .route(
            "/api/v1/prompts/:id",
            patch(prompts::handle_update_prompt).merge(delete(prompts::handle_delete_prompt)),
        )
        .with_state(state)
}
