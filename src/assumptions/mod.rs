//! Baseline actuarial assumptions: mortality and lapse tables

mod lapse;
mod mortality;
pub mod loader;

pub use lapse::LapseTable;
pub use mortality::MortalityTable;

use crate::error::StudyError;
use std::path::Path;

/// Container for the study's decrement assumptions
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub mortality: MortalityTable,
    pub lapse: LapseTable,
}

impl Assumptions {
    /// Synthetic assumptions matching the reference calibration
    pub fn synthetic() -> Self {
        Self {
            mortality: MortalityTable::synthetic(),
            lapse: LapseTable::synthetic(30),
        }
    }

    /// Load both tables from CSV files in a data directory
    pub fn from_csv_path(path: &Path) -> Result<Self, StudyError> {
        Ok(Self {
            mortality: loader::load_mortality_table(path)?,
            lapse: loader::load_lapse_table(path)?,
        })
    }

    /// Write both tables as CSV files into a data directory
    pub fn write_csv(&self, path: &Path) -> Result<(), StudyError> {
        loader::write_mortality_table(path, &self.mortality)?;
        loader::write_lapse_table(path, &self.lapse)
    }
}
