//! Exposure expansion
//!
//! Turns one simulated lifecycle into per-duration exposure records: a full
//! policy-year of exposure for every completed duration, and half a year on
//! the terminal record of a policy that exited mid-study. The half-year
//! convention is the standard mid-period exposure treatment for the exit
//! year; a policy that simply runs off its term keeps full exposure on its
//! last record.

use crate::policy::{
    DecrementEvent, Gender, Policy, PolicyStatus, SimulatedOutcome, SimulatedPolicy,
};
use serde::Serialize;

/// One policy-duration of exposure
///
/// For a given policy the durations form a contiguous run 1..=k, where k is
/// the exit duration (terminated) or the term length (inforce). `event` is
/// non-null only on the terminal record of a terminated policy.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureRecord {
    pub policy_id: u32,
    pub issue_year: i32,
    pub issue_age: u8,
    pub gender: Gender,
    pub smoker: bool,
    pub product: String,
    pub duration: u32,
    pub attained_age: u32,
    pub exposure: f64,
    pub event: Option<DecrementEvent>,
    pub status: PolicyStatus,
}

/// Exposure contributed by a terminated policy in its exit year
pub const PARTIAL_EXPOSURE: f64 = 0.5;

/// Expand one policy's lifecycle into exposure records
pub fn expand_policy(policy: &Policy, outcome: &SimulatedOutcome) -> Vec<ExposureRecord> {
    let last = outcome.exit_duration.unwrap_or(policy.term_length);
    let mut records = Vec::with_capacity(last as usize);

    for duration in 1..=last {
        let event = if Some(duration) == outcome.exit_duration {
            match outcome.status {
                PolicyStatus::Claimed => Some(DecrementEvent::Death),
                PolicyStatus::Lapsed => Some(DecrementEvent::Lapse),
                PolicyStatus::Inforce => None,
            }
        } else {
            None
        };
        let exposure = if event.is_some() { PARTIAL_EXPOSURE } else { 1.0 };

        records.push(ExposureRecord {
            policy_id: policy.policy_id,
            issue_year: policy.issue_year,
            issue_age: policy.issue_age,
            gender: policy.gender,
            smoker: policy.smoker,
            product: policy.product.clone(),
            duration,
            attained_age: policy.attained_age(duration),
            exposure,
            event,
            status: outcome.status,
        });
    }

    records
}

/// Expand a simulated portfolio into a flat exposure table, in portfolio order
pub fn expand_portfolio(simulated: &[SimulatedPolicy]) -> Vec<ExposureRecord> {
    simulated
        .iter()
        .flat_map(|sp| expand_policy(&sp.policy, &sp.outcome))
        .collect()
}
