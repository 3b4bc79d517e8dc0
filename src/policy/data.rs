//! Policy data structures matching the study inforce format

use serde::{Deserialize, Serialize};

/// Gender of the policyholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Single-letter code used in the flat files
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

/// Terminal status of a policy after simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    /// Survived every duration of the term
    Inforce,
    /// Terminated by death
    Claimed,
    /// Terminated by voluntary lapse
    Lapsed,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Inforce => "inforce",
            PolicyStatus::Claimed => "claimed",
            PolicyStatus::Lapsed => "lapsed",
        }
    }
}

/// Decrement recorded on the terminal exposure record of a terminated policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecrementEvent {
    Death,
    Lapse,
}

impl DecrementEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecrementEvent::Death => "death",
            DecrementEvent::Lapse => "lapse",
        }
    }
}

/// A single policy record from the study inforce
///
/// Only policy_id, issue_age, gender, smoker, issue_year and term_length are
/// consumed by the pipeline; product, face_amount and annual_premium pass
/// through untouched for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Unique policy identifier
    pub policy_id: u32,

    /// Issue age of the policyholder
    pub issue_age: u8,

    /// Gender of the policyholder
    pub gender: Gender,

    /// Smoker flag at issue
    pub smoker: bool,

    /// Calendar year of issue
    pub issue_year: i32,

    /// Term length in years
    pub term_length: u32,

    /// Product name (e.g. Term20)
    pub product: String,

    /// Face amount of the policy
    pub face_amount: f64,

    /// Annual premium
    pub annual_premium: f64,
}

impl Policy {
    /// Attained age at elapsed duration d (1-indexed policy year)
    pub fn attained_age(&self, duration: u32) -> u32 {
        self.issue_age as u32 + duration - 1
    }
}

/// Terminal outcome of the competing-decrement simulation for one policy
///
/// Invariant: exit_year and exit_duration are `Some` iff status != Inforce,
/// with 1 <= exit_duration <= term_length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedOutcome {
    pub status: PolicyStatus,

    /// Calendar year of exit (issue_year + exit_duration - 1)
    pub exit_year: Option<i32>,

    /// Policy year in which the decrement occurred
    pub exit_duration: Option<u32>,
}

impl SimulatedOutcome {
    /// Outcome of a policy that survived its full term
    pub fn inforce() -> Self {
        Self {
            status: PolicyStatus::Inforce,
            exit_year: None,
            exit_duration: None,
        }
    }

    /// Outcome of a policy terminated at the given duration
    pub fn terminated(status: PolicyStatus, issue_year: i32, exit_duration: u32) -> Self {
        Self {
            status,
            exit_year: Some(issue_year + exit_duration as i32 - 1),
            exit_duration: Some(exit_duration),
        }
    }
}

/// A policy together with its simulated outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedPolicy {
    #[serde(flatten)]
    pub policy: Policy,
    #[serde(flatten)]
    pub outcome: SimulatedOutcome,
}
