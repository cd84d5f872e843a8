//! Export handlers for inspection reports

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::session::LanguageQuery;
use crate::services::reporting::InspectionReport;
use crate::services::{chart, document, spreadsheet, ReportingService, SessionService};
use crate::AppState;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Pixel size of the on-screen pie chart
const CHART_SIZE: u32 = 400;

async fn load_report(
    state: &AppState,
    session_id: Uuid,
    query: &LanguageQuery,
) -> AppResult<InspectionReport> {
    let service = SessionService::from_config(state.sessions.clone(), &state.config.sessions);
    let session = service.get_session(session_id).await?;
    let language = query.language_or(state.config.report.language());
    ReportingService::new(state.config.report.title.clone()).build_report(&session, language)
}

fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Export the workbook (field record, samples, results sheets)
pub async fn export_xlsx(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<LanguageQuery>,
) -> AppResult<Response> {
    let report = load_report(&state, session_id, &query).await?;
    let bytes = spreadsheet::export_xlsx(&report)?;
    tracing::info!(session_id = %session_id, samples = report.samples.len(), "Spreadsheet exported");
    Ok(attachment(
        XLSX_CONTENT_TYPE,
        &state.config.report.spreadsheet_filename,
        bytes,
    ))
}

/// Export the sample table as CSV
pub async fn export_csv(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<LanguageQuery>,
) -> AppResult<Response> {
    let report = load_report(&state, session_id, &query).await?;
    let csv = ReportingService::export_samples_csv(&report)?;
    Ok(attachment(
        "text/csv",
        &state.config.report.csv_filename,
        csv.into_bytes(),
    ))
}

/// Export the PDF report
pub async fn export_pdf(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<LanguageQuery>,
) -> AppResult<Response> {
    let report = load_report(&state, session_id, &query).await?;
    let bytes = document::export_pdf(&report)?;
    tracing::info!(session_id = %session_id, samples = report.samples.len(), "PDF report exported");
    Ok(attachment(
        "application/pdf",
        &state.config.report.document_filename,
        bytes,
    ))
}

/// Healthy vs affected pie chart as PNG
pub async fn get_chart_png(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Response> {
    let service = SessionService::from_config(state.sessions.clone(), &state.config.sessions);
    let results = service
        .get_results(session_id, state.config.report.language())
        .await?;
    let png = chart::render_pie_png(&results.chart, CHART_SIZE)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
