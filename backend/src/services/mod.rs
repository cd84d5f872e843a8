//! Business logic services for the borer inspection service

pub mod chart;
pub mod document;
pub mod reporting;
pub mod session;
pub mod spreadsheet;

pub use reporting::ReportingService;
pub use session::{SessionService, SessionStore};
