//! Experience Study - competing-decrement simulation and A/E mortality analysis
//!
//! This library provides:
//! - Seeded competing-risk simulation of death and lapse decrements per policy
//! - Exposure expansion with mid-period partial exposure at exit
//! - Actual-to-expected aggregation against a baseline mortality table
//! - Synthetic portfolio and assumption-table generation
//! - Flat CSV persistence of portfolios, tables, and results

pub mod assumptions;
pub mod error;
pub mod policy;
pub mod study;

// Re-export commonly used types
pub use assumptions::{Assumptions, LapseTable, MortalityTable};
pub use error::StudyError;
pub use policy::{Gender, Policy, PolicyStatus, SimulatedOutcome, SimulatedPolicy};
pub use study::{
    actual_to_expected, expand_portfolio, simulate_portfolio, AggregateRow, ExposureRecord,
    GroupBy,
};
