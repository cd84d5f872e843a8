//! Domain models for the borer inspection service

mod chart;
mod field;
mod infestation;
mod sampling;

pub use chart::*;
pub use field::*;
pub use infestation::*;
pub use sampling::*;
