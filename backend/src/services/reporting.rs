//! Reporting service for inspection results and data export
//! Builds the report snapshot that the spreadsheet, CSV and PDF exporters transcribe

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::services::session::{AnalysisResults, InspectionSession};
use shared::{FieldRecord, Language, StalkSample};

/// Sample table column headers
pub const SAMPLE_HEADERS: [&str; 3] = ["Tallo", "Total entrenudos", "Entrenudos barrenados"];

/// Results table column headers
pub const RESULT_HEADERS: [&str; 3] = ["Índice de Infestación (%)", "Estado", "Acciones"];

/// Everything an export needs, captured at export time
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub title: String,
    pub language: Language,
    pub field_record: FieldRecord,
    pub samples: Vec<StalkSample>,
    pub results: AnalysisResults,
    pub generated_at: DateTime<Utc>,
}

/// One row of the sample CSV export
#[derive(Debug, Serialize)]
pub struct SampleRow {
    #[serde(rename = "Tallo")]
    pub sequence: u32,
    #[serde(rename = "Total entrenudos")]
    pub total_internodes: u32,
    #[serde(rename = "Entrenudos barrenados")]
    pub damaged_internodes: u32,
}

impl From<&StalkSample> for SampleRow {
    fn from(sample: &StalkSample) -> Self {
        Self {
            sequence: sample.sequence,
            total_internodes: sample.total_internodes,
            damaged_internodes: sample.damaged_internodes,
        }
    }
}

impl InspectionReport {
    /// Infestation index rounded to two decimals
    pub fn rounded_index(&self) -> Decimal {
        self.results
            .classification
            .infestation_index
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Infestation index as printed, e.g. `5.00%`
    pub fn index_label(&self) -> String {
        format!("{:.2}%", self.rounded_index())
    }
}

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    title: String,
}

impl ReportingService {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Snapshot a session for export. Requires at least one sample.
    pub fn build_report(
        &self,
        session: &InspectionSession,
        language: Language,
    ) -> AppResult<InspectionReport> {
        if !session.exports_available() {
            return Err(AppError::ExportUnavailable);
        }

        Ok(InspectionReport {
            title: self.title.clone(),
            language,
            field_record: session.field_record.clone(),
            samples: session.samples.samples().to_vec(),
            results: AnalysisResults::from_samples(&session.samples, language),
            generated_at: Utc::now(),
        })
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            AppError::ExportFailed(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| AppError::ExportFailed(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }

    /// Sample table as CSV, one row per stalk in insertion order
    pub fn export_samples_csv(report: &InspectionReport) -> AppResult<String> {
        let rows: Vec<SampleRow> = report.samples.iter().map(SampleRow::from).collect();
        Self::export_to_csv(&rows)
    }
}
