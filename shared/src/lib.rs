//! Shared types and models for the sugarcane borer inspection service
//!
//! This crate contains the sampling aggregator and infestation classifier
//! shared between the backend, the browser form (via WASM), and the tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
