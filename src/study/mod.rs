//! The three-stage experience-study pipeline
//!
//! 1. `decrement` simulates each policy's terminal outcome under competing
//!    death and lapse decrements;
//! 2. `exposure` expands each outcome into per-duration exposure records;
//! 3. `experience` aggregates exposure against the baseline mortality table
//!    into actual-to-expected ratios.
//!
//! Policies flow through the first two stages independently; the aggregator
//! consumes the concatenated exposure table once.

mod decrement;
mod experience;
mod exposure;

pub use decrement::{
    adjusted_qx, policy_rng, simulate_policy, simulate_portfolio, FEMALE_MORTALITY_MULT,
    MALE_MORTALITY_MULT, SMOKER_MORTALITY_MULT,
};
pub use experience::{actual_to_expected, AggregateRow, GroupBy, GroupKey};
pub use exposure::{expand_policy, expand_portfolio, ExposureRecord, PARTIAL_EXPOSURE};
