//! Experience aggregation: actual-to-expected mortality by a typed grouping key
//!
//! Joins the exposure table to the baseline mortality table on attained age
//! and accumulates exposure, actual deaths, and expected deaths per group.
//! The join is exact: an exposure record whose attained age has no baseline
//! row contributes nothing to expected deaths and is surfaced per group as
//! `unmatched_exposure` instead of being silently counted as zero expected.

use super::ExposureRecord;
use crate::assumptions::MortalityTable;
use crate::policy::{DecrementEvent, Gender};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Grouping dimension for the A/E aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Attained age at the start of each duration (the default)
    AttainedAge,
    /// Elapsed policy duration
    Duration,
    /// Gender of the policyholder
    Gender,
    /// Smoker flag at issue
    Smoker,
    /// Calendar year of issue
    IssueYear,
    /// Product name
    Product,
}

impl GroupBy {
    /// Column name used in tabular output
    pub fn column_name(&self) -> &'static str {
        match self {
            GroupBy::AttainedAge => "attained_age",
            GroupBy::Duration => "duration",
            GroupBy::Gender => "gender",
            GroupBy::Smoker => "smoker",
            GroupBy::IssueYear => "issue_year",
            GroupBy::Product => "product",
        }
    }

    fn key_of(&self, record: &ExposureRecord) -> GroupKey {
        match self {
            GroupBy::AttainedAge => GroupKey::AttainedAge(record.attained_age),
            GroupBy::Duration => GroupKey::Duration(record.duration),
            GroupBy::Gender => GroupKey::Gender(record.gender),
            GroupBy::Smoker => GroupKey::Smoker(record.smoker),
            GroupBy::IssueYear => GroupKey::IssueYear(record.issue_year),
            GroupBy::Product => GroupKey::Product(record.product.clone()),
        }
    }
}

impl Default for GroupBy {
    fn default() -> Self {
        GroupBy::AttainedAge
    }
}

/// One distinct value of the grouping dimension
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub enum GroupKey {
    AttainedAge(u32),
    Duration(u32),
    Gender(Gender),
    Smoker(bool),
    IssueYear(i32),
    Product(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::AttainedAge(age) => write!(f, "{}", age),
            GroupKey::Duration(d) => write!(f, "{}", d),
            GroupKey::Gender(g) => write!(f, "{}", g.as_str()),
            GroupKey::Smoker(s) => write!(f, "{}", *s as u8),
            GroupKey::IssueYear(y) => write!(f, "{}", y),
            GroupKey::Product(p) => write!(f, "{}", p),
        }
    }
}

impl From<GroupKey> for String {
    fn from(key: GroupKey) -> Self {
        key.to_string()
    }
}

/// Aggregated experience for one value of the grouping key
#[derive(Debug, Clone, Serialize)]
pub struct AggregateRow {
    /// Distinct grouping-key value
    pub key: GroupKey,

    /// Total policy-years of exposure in the group
    pub exposure: f64,

    /// Observed death count
    pub actual_deaths: u32,

    /// Expected death count: sum of exposure x baseline qx over matched records
    pub expected_deaths: f64,

    /// Exposure on records whose attained age has no baseline mortality row;
    /// excluded from expected_deaths rather than coerced to zero
    pub unmatched_exposure: f64,

    /// A/E ratio; None when expected_deaths is exactly zero
    pub actual_to_expected: Option<f64>,
}

#[derive(Debug, Default)]
struct Accumulator {
    exposure: f64,
    actual_deaths: u32,
    expected_deaths: f64,
    unmatched_exposure: f64,
}

/// Aggregate an exposure table into A/E statistics by the given key
///
/// Output rows are sorted by key value. An empty exposure table yields an
/// empty result.
pub fn actual_to_expected(
    records: &[ExposureRecord],
    mortality: &MortalityTable,
    group_by: GroupBy,
) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
    let mut unmatched_records = 0usize;

    for record in records {
        let acc = groups.entry(group_by.key_of(record)).or_default();

        acc.exposure += record.exposure;
        if record.event == Some(DecrementEvent::Death) {
            acc.actual_deaths += 1;
        }

        match mortality.qx(record.attained_age) {
            Some(qx) => acc.expected_deaths += record.exposure * qx,
            None => {
                acc.unmatched_exposure += record.exposure;
                unmatched_records += 1;
            }
        }
    }

    if unmatched_records > 0 {
        log::warn!(
            "{} exposure records had no baseline mortality row; their expected contribution is excluded",
            unmatched_records
        );
    }

    groups
        .into_iter()
        .map(|(key, acc)| {
            let actual_to_expected = if acc.expected_deaths > 0.0 {
                Some(acc.actual_deaths as f64 / acc.expected_deaths)
            } else {
                None
            };
            AggregateRow {
                key,
                exposure: acc.exposure,
                actual_deaths: acc.actual_deaths,
                expected_deaths: acc.expected_deaths,
                unmatched_exposure: acc.unmatched_exposure,
                actual_to_expected,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Policy, PolicyStatus, SimulatedOutcome};
    use crate::study::expand_policy;
    use approx::assert_relative_eq;

    fn policy(id: u32, issue_age: u8, gender: Gender, term_length: u32) -> Policy {
        Policy {
            policy_id: id,
            issue_age,
            gender,
            smoker: false,
            issue_year: 2015,
            term_length,
            product: "Term10".to_string(),
            face_amount: 100_000.0,
            annual_premium: 450.0,
        }
    }

    fn small_table() -> MortalityTable {
        MortalityTable::from_points(vec![
            (40, 0.0010),
            (41, 0.0011),
            (42, 0.0012),
            (43, 0.0013),
            (44, 0.0014),
        ])
        .unwrap()
    }

    #[test]
    fn test_survivors_expected_denominator() {
        // N identical survivors: N x term records, all full exposure, and an
        // expected denominator of N x sum of the per-duration rates
        let table = small_table();
        let n = 4;
        let term = 5;

        let mut records = Vec::new();
        for id in 1..=n {
            let p = policy(id, 40, Gender::Female, term);
            records.extend(expand_policy(&p, &SimulatedOutcome::inforce()));
        }
        assert_eq!(records.len(), (n * term) as usize);

        let rows = actual_to_expected(&records, &table, GroupBy::Gender);
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.key, GroupKey::Gender(Gender::Female));
        assert_eq!(row.exposure, (n * term) as f64);
        assert_eq!(row.actual_deaths, 0);
        let qx_sum: f64 = [0.0010, 0.0011, 0.0012, 0.0013, 0.0014].iter().sum();
        assert_relative_eq!(row.expected_deaths, n as f64 * qx_sum, max_relative = 1e-12);

        // No deaths but positive expected: A/E is zero, not None
        assert_eq!(row.actual_to_expected, Some(0.0));
    }

    #[test]
    fn test_death_counts_and_ratio() {
        let table = small_table();
        let p = policy(1, 40, Gender::Female, 5);
        let outcome = SimulatedOutcome::terminated(PolicyStatus::Claimed, 2015, 3);
        let records = expand_policy(&p, &outcome);

        let rows = actual_to_expected(&records, &table, GroupBy::Gender);
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.actual_deaths, 1);
        // Durations 1 and 2 at full exposure, duration 3 at half
        assert_eq!(row.exposure, 2.5);
        let expected = 1.0 * 0.0010 + 1.0 * 0.0011 + 0.5 * 0.0012;
        assert_relative_eq!(row.expected_deaths, expected, max_relative = 1e-12);
        assert_relative_eq!(
            row.actual_to_expected.unwrap(),
            1.0 / expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_lapse_is_not_a_death() {
        let table = small_table();
        let p = policy(1, 40, Gender::Male, 5);
        let outcome = SimulatedOutcome::terminated(PolicyStatus::Lapsed, 2015, 2);
        let records = expand_policy(&p, &outcome);

        let rows = actual_to_expected(&records, &table, GroupBy::AttainedAge);
        let total_actual: u32 = rows.iter().map(|r| r.actual_deaths).sum();
        assert_eq!(total_actual, 0);
    }

    #[test]
    fn test_unmatched_ages_surface_not_zero() {
        // Policy attains ages 50..54, entirely outside the baseline table
        let table = small_table();
        let p = policy(1, 50, Gender::Female, 5);
        let records = expand_policy(&p, &SimulatedOutcome::inforce());

        let rows = actual_to_expected(&records, &table, GroupBy::Gender);
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.exposure, 5.0);
        assert_eq!(row.expected_deaths, 0.0);
        assert_eq!(row.unmatched_exposure, 5.0);
        // Zero expected must yield None, never a panic or infinity
        assert_eq!(row.actual_to_expected, None);
    }

    #[test]
    fn test_partially_matched_group() {
        // Ages 43..47: the first two durations match, the rest fall off the table
        let table = small_table();
        let p = policy(1, 43, Gender::Female, 5);
        let records = expand_policy(&p, &SimulatedOutcome::inforce());

        let rows = actual_to_expected(&records, &table, GroupBy::Gender);
        let row = &rows[0];

        assert_relative_eq!(row.expected_deaths, 0.0013 + 0.0014, max_relative = 1e-12);
        assert_eq!(row.unmatched_exposure, 3.0);
    }

    #[test]
    fn test_group_by_attained_age_is_sorted() {
        let table = small_table();
        let mut records = Vec::new();
        records.extend(expand_policy(
            &policy(1, 42, Gender::Female, 3),
            &SimulatedOutcome::inforce(),
        ));
        records.extend(expand_policy(
            &policy(2, 40, Gender::Male, 3),
            &SimulatedOutcome::inforce(),
        ));

        let rows = actual_to_expected(&records, &table, GroupBy::AttainedAge);
        let ages: Vec<GroupKey> = rows.iter().map(|r| r.key.clone()).collect();
        assert_eq!(
            ages,
            vec![
                GroupKey::AttainedAge(40),
                GroupKey::AttainedAge(41),
                GroupKey::AttainedAge(42),
                GroupKey::AttainedAge(43),
                GroupKey::AttainedAge(44),
            ]
        );

        // Age 42 is reached by both policies
        let row42 = &rows[2];
        assert_eq!(row42.exposure, 2.0);
    }

    #[test]
    fn test_empty_exposure_table() {
        let rows = actual_to_expected(&[], &small_table(), GroupBy::AttainedAge);
        assert!(rows.is_empty());
    }
}
