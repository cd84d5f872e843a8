//! HTTP handlers for the borer inspection service

pub mod health;
pub mod reporting;
pub mod session;

pub use health::health_check;
pub use reporting::{export_csv, export_pdf, export_xlsx, get_chart_png};
pub use session::{
    add_sample, clear_samples, continue_to_analysis, create_session, delete_session, get_results,
    get_session, remove_last_sample, restart_session, update_field_record,
};
