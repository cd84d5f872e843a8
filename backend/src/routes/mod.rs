//! Route definitions for the borer inspection service

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/sessions", session_routes())
}

/// Inspection session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        // Page flow
        .route("/:session_id/continue", post(handlers::continue_to_analysis))
        .route("/:session_id/restart", post(handlers::restart_session))
        // Form input
        .route("/:session_id/field-record", put(handlers::update_field_record))
        .route(
            "/:session_id/samples",
            post(handlers::add_sample).delete(handlers::clear_samples),
        )
        .route("/:session_id/samples/last", delete(handlers::remove_last_sample))
        // Results and exports
        .route("/:session_id/results", get(handlers::get_results))
        .route("/:session_id/chart.png", get(handlers::get_chart_png))
        .route("/:session_id/export/xlsx", get(handlers::export_xlsx))
        .route("/:session_id/export/csv", get(handlers::export_csv))
        .route("/:session_id/export/pdf", get(handlers::export_pdf))
}
