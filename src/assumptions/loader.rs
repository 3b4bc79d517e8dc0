//! CSV persistence for the assumption tables
//!
//! Both tables are plain delimited text with a header row:
//! `mortality_table.csv` holds `age,qx`, `lapse_table.csv` holds
//! `duration,lapse_rate`. Loading validates the table contracts (strictly
//! increasing keys, rates in range) before anything downstream runs.

use super::{LapseTable, MortalityTable};
use crate::error::StudyError;
use csv::Reader;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// File name of the mortality table within a data directory
pub const MORTALITY_FILE: &str = "mortality_table.csv";

/// File name of the lapse table within a data directory
pub const LAPSE_FILE: &str = "lapse_table.csv";

#[derive(Debug, serde::Deserialize)]
struct MortalityRow {
    age: u32,
    qx: f64,
}

#[derive(Debug, serde::Deserialize)]
struct LapseRow {
    duration: u32,
    lapse_rate: f64,
}

/// Load a mortality table from any reader
pub fn load_mortality_from_reader<R: std::io::Read>(
    reader: R,
    file: &str,
) -> Result<MortalityTable, StudyError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut points = Vec::new();

    for result in csv_reader.deserialize() {
        let row: MortalityRow = result.map_err(|e| StudyError::csv(file, e))?;
        points.push((row.age, row.qx));
    }

    MortalityTable::from_points(points)
}

/// Load the mortality table from a data directory
pub fn load_mortality_table(dir: &Path) -> Result<MortalityTable, StudyError> {
    let path = dir.join(MORTALITY_FILE);
    let file = File::open(&path)?;
    load_mortality_from_reader(file, &path.to_string_lossy())
}

/// Load a lapse table from any reader
pub fn load_lapse_from_reader<R: std::io::Read>(
    reader: R,
    file: &str,
) -> Result<LapseTable, StudyError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut points = Vec::new();

    for result in csv_reader.deserialize() {
        let row: LapseRow = result.map_err(|e| StudyError::csv(file, e))?;
        points.push((row.duration, row.lapse_rate));
    }

    LapseTable::from_points(points)
}

/// Load the lapse table from a data directory
pub fn load_lapse_table(dir: &Path) -> Result<LapseTable, StudyError> {
    let path = dir.join(LAPSE_FILE);
    let file = File::open(&path)?;
    load_lapse_from_reader(file, &path.to_string_lossy())
}

/// Write a mortality table to any writer
pub fn write_mortality_to_writer<W: Write>(
    writer: &mut W,
    table: &MortalityTable,
) -> Result<(), StudyError> {
    writeln!(writer, "age,qx")?;
    for (age, qx) in table.iter() {
        writeln!(writer, "{},{}", age, qx)?;
    }
    Ok(())
}

/// Write the mortality table into a data directory
pub fn write_mortality_table(dir: &Path, table: &MortalityTable) -> Result<(), StudyError> {
    let mut file = File::create(dir.join(MORTALITY_FILE))?;
    write_mortality_to_writer(&mut file, table)
}

/// Write a lapse table to any writer
pub fn write_lapse_to_writer<W: Write>(
    writer: &mut W,
    table: &LapseTable,
) -> Result<(), StudyError> {
    writeln!(writer, "duration,lapse_rate")?;
    for (duration, rate) in table.iter() {
        writeln!(writer, "{},{}", duration, rate)?;
    }
    Ok(())
}

/// Write the lapse table into a data directory
pub fn write_lapse_table(dir: &Path, table: &LapseTable) -> Result<(), StudyError> {
    let mut file = File::create(dir.join(LAPSE_FILE))?;
    write_lapse_to_writer(&mut file, table)
}
