//! Synthetic portfolio generation
//!
//! Samples policy attributes from the reference calibration: issue ages
//! uniform over 20..=60, an 80/20 non-smoker/smoker split, terms of 10/20/30
//! years weighted 50/35/15, and log-normal face amounts. Fully seeded so a
//! given (seed, count) pair always yields the same portfolio.

use super::{Gender, Policy};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, LogNormal};

/// Parameters for synthetic portfolio sampling
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Number of policies to generate
    pub n_policies: usize,
    /// Seed for the attribute sampler
    pub seed: u64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            n_policies: 1000,
            seed: 42,
        }
    }
}

/// Log-normal face amount parameters (mean ~$90k before clamping)
const FACE_MU: f64 = 11.2;
const FACE_SIGMA: f64 = 0.6;
const FACE_MIN: f64 = 50_000.0;
const FACE_MAX: f64 = 750_000.0;

/// Annual premium per dollar of face, by term length
fn premium_base_rate(term_length: u32) -> f64 {
    match term_length {
        10 => 0.0045,
        20 => 0.0065,
        _ => 0.0085,
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Generate a synthetic policy portfolio
pub fn generate_portfolio(config: &PortfolioConfig) -> Vec<Policy> {
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
    // Parameters are compile-time constants with sigma > 0
    let face_dist = LogNormal::new(FACE_MU, FACE_SIGMA).expect("valid log-normal parameters");

    let mut policies = Vec::with_capacity(config.n_policies);
    for i in 0..config.n_policies {
        let issue_age: u8 = rng.random_range(20..=60);
        let gender = if rng.random_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let smoker = rng.random_bool(0.2);
        let issue_year: i32 = rng.random_range(2012..=2022);

        let term_length = match rng.random::<f64>() {
            u if u < 0.50 => 10,
            u if u < 0.85 => 20,
            _ => 30,
        };
        let product = format!("Term{}", term_length);

        let face_amount = face_dist.sample(&mut rng).clamp(FACE_MIN, FACE_MAX);
        let load = 1.0
            + if smoker { 0.35 } else { 0.0 }
            + if gender == Gender::Male { 0.10 } else { 0.0 };
        let annual_premium = round_cents(face_amount * premium_base_rate(term_length) * load);

        policies.push(Policy {
            policy_id: i as u32 + 1,
            issue_age,
            gender,
            smoker,
            issue_year,
            term_length,
            product,
            face_amount: round_cents(face_amount),
            annual_premium,
        });
    }

    policies
}
