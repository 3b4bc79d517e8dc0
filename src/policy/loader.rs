//! Load and persist the policy portfolio as `policies.csv`
//!
//! The file carries one policy per row. Attribute columns are always present;
//! the outcome columns (status, exit_year, exit_duration) only exist once a
//! portfolio has been through the simulator, so loading tolerates both shapes.

use super::{Gender, Policy, PolicyStatus, SimulatedOutcome, SimulatedPolicy};
use crate::error::StudyError;
use crate::study::ExposureRecord;
use csv::Reader;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// File name of the portfolio within a data directory
pub const POLICIES_FILE: &str = "policies.csv";

/// Raw CSV row matching policies.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    policy_id: u32,
    issue_age: u8,
    gender: String,
    smoker: u8,
    issue_year: i32,
    term_length: u32,
    product: String,
    face_amount: f64,
    annual_premium: f64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    exit_year: Option<i32>,
    #[serde(default)]
    exit_duration: Option<u32>,
}

impl CsvRow {
    fn to_policy(&self, file: &str) -> Result<Policy, StudyError> {
        let gender = match self.gender.as_str() {
            "M" => Gender::Male,
            "F" => Gender::Female,
            other => {
                return Err(StudyError::schema(
                    file,
                    format!("policy {}: unknown gender code {:?}", self.policy_id, other),
                ))
            }
        };

        let smoker = match self.smoker {
            0 => false,
            1 => true,
            other => {
                return Err(StudyError::schema(
                    file,
                    format!("policy {}: smoker flag must be 0 or 1, got {}", self.policy_id, other),
                ))
            }
        };

        if self.term_length == 0 {
            return Err(StudyError::schema(
                file,
                format!("policy {}: term_length must be positive", self.policy_id),
            ));
        }

        Ok(Policy {
            policy_id: self.policy_id,
            issue_age: self.issue_age,
            gender,
            smoker,
            issue_year: self.issue_year,
            term_length: self.term_length,
            product: self.product.clone(),
            face_amount: self.face_amount,
            annual_premium: self.annual_premium,
        })
    }

    fn to_outcome(&self, file: &str, policy: &Policy) -> Result<SimulatedOutcome, StudyError> {
        let status = match self.status.as_deref() {
            Some("inforce") => PolicyStatus::Inforce,
            Some("claimed") => PolicyStatus::Claimed,
            Some("lapsed") => PolicyStatus::Lapsed,
            Some(other) => {
                return Err(StudyError::schema(
                    file,
                    format!("policy {}: unknown status {:?}", policy.policy_id, other),
                ))
            }
            None => {
                return Err(StudyError::schema(
                    file,
                    format!("policy {}: status column required for a simulated portfolio", policy.policy_id),
                ))
            }
        };

        match (status, self.exit_duration) {
            (PolicyStatus::Inforce, None) => Ok(SimulatedOutcome::inforce()),
            (PolicyStatus::Inforce, Some(_)) => Err(StudyError::schema(
                file,
                format!("policy {}: inforce rows must not carry an exit duration", policy.policy_id),
            )),
            (_, Some(d)) if d >= 1 && d <= policy.term_length => {
                Ok(SimulatedOutcome::terminated(status, policy.issue_year, d))
            }
            (_, Some(d)) => Err(StudyError::schema(
                file,
                format!(
                    "policy {}: exit_duration {} outside 1..={}",
                    policy.policy_id, d, policy.term_length
                ),
            )),
            (_, None) => Err(StudyError::schema(
                file,
                format!("policy {}: terminated rows require an exit duration", policy.policy_id),
            )),
        }
    }
}

/// Load policy attributes from any reader, ignoring outcome columns if present
pub fn load_policies_from_reader<R: std::io::Read>(
    reader: R,
    file: &str,
) -> Result<Vec<Policy>, StudyError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut policies = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|e| StudyError::csv(file, e))?;
        policies.push(row.to_policy(file)?);
    }

    Ok(policies)
}

/// Load all policies from a data directory
pub fn load_policies(dir: &Path) -> Result<Vec<Policy>, StudyError> {
    let path = dir.join(POLICIES_FILE);
    let file = File::open(&path)?;
    load_policies_from_reader(file, &path.to_string_lossy())
}

/// Load a simulated portfolio (attributes plus outcome columns) from any reader
pub fn load_simulated_from_reader<R: std::io::Read>(
    reader: R,
    file: &str,
) -> Result<Vec<SimulatedPolicy>, StudyError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut simulated = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|e| StudyError::csv(file, e))?;
        let policy = row.to_policy(file)?;
        let outcome = row.to_outcome(file, &policy)?;
        simulated.push(SimulatedPolicy { policy, outcome });
    }

    Ok(simulated)
}

/// Load a simulated portfolio from a data directory
pub fn load_simulated_policies(dir: &Path) -> Result<Vec<SimulatedPolicy>, StudyError> {
    let path = dir.join(POLICIES_FILE);
    let file = File::open(&path)?;
    load_simulated_from_reader(file, &path.to_string_lossy())
}

fn fmt_opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// Write a simulated portfolio to any writer
pub fn write_simulated_to_writer<W: Write>(
    writer: &mut W,
    simulated: &[SimulatedPolicy],
) -> Result<(), StudyError> {
    writeln!(
        writer,
        "policy_id,issue_age,gender,smoker,issue_year,term_length,product,face_amount,annual_premium,status,exit_year,exit_duration"
    )?;

    for sp in simulated {
        let p = &sp.policy;
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{:.2},{:.2},{},{},{}",
            p.policy_id,
            p.issue_age,
            p.gender.as_str(),
            p.smoker as u8,
            p.issue_year,
            p.term_length,
            p.product,
            p.face_amount,
            p.annual_premium,
            sp.outcome.status.as_str(),
            fmt_opt(&sp.outcome.exit_year),
            fmt_opt(&sp.outcome.exit_duration),
        )?;
    }

    Ok(())
}

/// Write a simulated portfolio into a data directory
pub fn write_simulated_policies(dir: &Path, simulated: &[SimulatedPolicy]) -> Result<(), StudyError> {
    let mut file = File::create(dir.join(POLICIES_FILE))?;
    write_simulated_to_writer(&mut file, simulated)
}

/// Write a flat exposure table to any writer
pub fn write_exposures_to_writer<W: Write>(
    writer: &mut W,
    records: &[ExposureRecord],
) -> Result<(), StudyError> {
    writeln!(
        writer,
        "policy_id,issue_year,issue_age,gender,smoker,product,duration,attained_age,exposure,event,status"
    )?;

    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{}",
            r.policy_id,
            r.issue_year,
            r.issue_age,
            r.gender.as_str(),
            r.smoker as u8,
            r.product,
            r.duration,
            r.attained_age,
            r.exposure,
            r.event.map(|e| e.as_str()).unwrap_or(""),
            r.status.as_str(),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTRS_ONLY: &str = "\
policy_id,issue_age,gender,smoker,issue_year,term_length,product,face_amount,annual_premium
1,40,F,0,2015,10,Term10,100000.00,450.00
2,55,M,1,2018,20,Term20,250000.00,2356.25
";

    const WITH_OUTCOMES: &str = "\
policy_id,issue_age,gender,smoker,issue_year,term_length,product,face_amount,annual_premium,status,exit_year,exit_duration
1,40,F,0,2015,10,Term10,100000.00,450.00,inforce,,
2,55,M,1,2018,20,Term20,250000.00,2356.25,claimed,2021,4
";

    #[test]
    fn test_load_attributes_only() {
        let policies = load_policies_from_reader(ATTRS_ONLY.as_bytes(), "policies.csv").unwrap();
        assert_eq!(policies.len(), 2);

        let p2 = &policies[1];
        assert_eq!(p2.policy_id, 2);
        assert_eq!(p2.gender, Gender::Male);
        assert!(p2.smoker);
        assert_eq!(p2.term_length, 20);
    }

    #[test]
    fn test_load_with_outcomes() {
        let simulated =
            load_simulated_from_reader(WITH_OUTCOMES.as_bytes(), "policies.csv").unwrap();
        assert_eq!(simulated.len(), 2);

        assert_eq!(simulated[0].outcome.status, PolicyStatus::Inforce);
        assert_eq!(simulated[0].outcome.exit_duration, None);

        assert_eq!(simulated[1].outcome.status, PolicyStatus::Claimed);
        assert_eq!(simulated[1].outcome.exit_year, Some(2021));
        assert_eq!(simulated[1].outcome.exit_duration, Some(4));
    }

    #[test]
    fn test_attribute_loader_ignores_outcome_columns() {
        let policies =
            load_policies_from_reader(WITH_OUTCOMES.as_bytes(), "policies.csv").unwrap();
        assert_eq!(policies.len(), 2);
    }

    #[test]
    fn test_simulated_loader_requires_status() {
        let result = load_simulated_from_reader(ATTRS_ONLY.as_bytes(), "policies.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_gender_fails_fast() {
        let csv = "\
policy_id,issue_age,gender,smoker,issue_year,term_length,product,face_amount,annual_premium
1,40,X,0,2015,10,Term10,100000.00,450.00
";
        let result = load_policies_from_reader(csv.as_bytes(), "policies.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_exit_duration_beyond_term_fails() {
        let csv = "\
policy_id,issue_age,gender,smoker,issue_year,term_length,product,face_amount,annual_premium,status,exit_year,exit_duration
1,40,F,0,2015,10,Term10,100000.00,450.00,lapsed,2030,16
";
        let result = load_simulated_from_reader(csv.as_bytes(), "policies.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip() {
        let simulated =
            load_simulated_from_reader(WITH_OUTCOMES.as_bytes(), "policies.csv").unwrap();

        let mut buf = Vec::new();
        write_simulated_to_writer(&mut buf, &simulated).unwrap();

        let reloaded = load_simulated_from_reader(buf.as_slice(), "policies.csv").unwrap();
        assert_eq!(reloaded.len(), simulated.len());
        assert_eq!(reloaded[1].outcome, simulated[1].outcome);
        assert_eq!(reloaded[1].policy.product, "Term20");
    }
}
