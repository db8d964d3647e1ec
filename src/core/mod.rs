//! Core types and traits for mutant filtering.

mod analyzer;
mod error;
mod input_set;
mod unit;

pub use analyzer::{AnalysisContext, Analyzer, Elapsed};
pub use error::{Error, Result};
pub use input_set::InputSet;
pub use unit::{AnalysisUnit, UnitFormat};
