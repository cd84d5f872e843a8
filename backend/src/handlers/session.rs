//! HTTP handlers for the inspection session flow

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::session::{AddSampleInput, AnalysisResults, SessionService, SessionView};
use crate::AppState;
use shared::{FieldRecord, Language, StalkSample};

#[derive(Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>, // "es" or "en"
}

impl LanguageQuery {
    pub fn language_or(&self, default: Language) -> Language {
        self.lang.as_deref().map(Language::from_code).unwrap_or(default)
    }
}

#[derive(Serialize, Deserialize)]
pub struct RemoveLastResponse {
    pub removed: bool,
    pub sample_count: usize,
}

fn session_service(state: &AppState) -> SessionService {
    SessionService::from_config(state.sessions.clone(), &state.config.sessions)
}

/// Open a new inspection session on the landing page
pub async fn create_session(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<SessionView>)> {
    let session = session_service(&state).create_session().await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Get an inspection session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = session_service(&state).get_session(session_id).await?;
    Ok(Json(session.into()))
}

/// Drop an inspection session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    session_service(&state).delete_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// "Continue" from the landing page to the analysis page
pub async fn continue_to_analysis(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = session_service(&state).continue_to_analysis(session_id).await?;
    Ok(Json(session.into()))
}

/// Reset the session to the landing page
pub async fn restart_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = session_service(&state).restart_session(session_id).await?;
    Ok(Json(session.into()))
}

/// Replace the field identification record
pub async fn update_field_record(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(record): Json<FieldRecord>,
) -> AppResult<Json<SessionView>> {
    let session = session_service(&state)
        .update_field_record(session_id, record)
        .await?;
    Ok(Json(session.into()))
}

/// Add a stalk sample
pub async fn add_sample(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<AddSampleInput>,
) -> AppResult<(StatusCode, Json<StalkSample>)> {
    let sample = session_service(&state).add_sample(session_id, input).await?;
    Ok((StatusCode::CREATED, Json(sample)))
}

/// Remove the most recently added stalk sample
pub async fn remove_last_sample(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<RemoveLastResponse>> {
    let (removed, sample_count) = session_service(&state)
        .remove_last_sample(session_id)
        .await?;
    Ok(Json(RemoveLastResponse {
        removed,
        sample_count,
    }))
}

/// Remove all stalk samples
pub async fn clear_samples(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = session_service(&state).clear_samples(session_id).await?;
    Ok(Json(session.into()))
}

/// Get infestation index, tier, recommendation and chart shares
pub async fn get_results(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<LanguageQuery>,
) -> AppResult<Json<AnalysisResults>> {
    let language = query.language_or(state.config.report.language());
    let results = session_service(&state)
        .get_results(session_id, language)
        .await?;
    Ok(Json(results))
}
