//! Baseline mortality assumption
//!
//! The table is an ordered mapping from attained age to an annual mortality
//! rate qx. Two lookup modes exist because the simulator and the aggregator
//! want different semantics:
//! - the simulator clamps out-of-range ages to the nearest tabulated row
//!   (ages past the table reuse the final rate, no extrapolation);
//! - the A/E join is exact, so an unmatched age yields `None` and the caller
//!   decides what a missing expected contribution means.

use crate::error::StudyError;

/// Ordered age -> qx mapping over a bounded age range
#[derive(Debug, Clone)]
pub struct MortalityTable {
    ages: Vec<u32>,
    rates: Vec<f64>,
}

impl MortalityTable {
    /// Build from ordered (age, qx) points
    ///
    /// Ages must be strictly increasing and every qx must lie in (0, 1).
    /// Gaps in the age range are allowed.
    pub fn from_points(points: Vec<(u32, f64)>) -> Result<Self, StudyError> {
        if points.is_empty() {
            return Err(StudyError::table("mortality", "table has no rows"));
        }

        let mut ages = Vec::with_capacity(points.len());
        let mut rates = Vec::with_capacity(points.len());

        for (age, qx) in points {
            if let Some(&prev) = ages.last() {
                if age <= prev {
                    return Err(StudyError::table(
                        "mortality",
                        format!("ages must be strictly increasing: {} after {}", age, prev),
                    ));
                }
            }
            if !(qx > 0.0 && qx < 1.0) {
                return Err(StudyError::table(
                    "mortality",
                    format!("qx at age {} out of range (0, 1): {}", age, qx),
                ));
            }
            ages.push(age);
            rates.push(qx);
        }

        Ok(Self { ages, rates })
    }

    /// Synthetic Gompertz-style table covering ages 20..=100
    ///
    /// qx = 0.0004 * exp(0.075 * (age - 30)), clamped to [1e-6, 0.35]
    pub fn synthetic() -> Self {
        let ages: Vec<u32> = (20..=100).collect();
        let rates = ages
            .iter()
            .map(|&age| {
                let qx = 0.0004 * (0.075 * (age as f64 - 30.0)).exp();
                qx.clamp(1e-6, 0.35)
            })
            .collect();
        Self { ages, rates }
    }

    /// Youngest tabulated age
    pub fn min_age(&self) -> u32 {
        self.ages.first().copied().unwrap_or(0)
    }

    /// Oldest tabulated age
    pub fn max_age(&self) -> u32 {
        self.ages.last().copied().unwrap_or(0)
    }

    /// Exact lookup: `None` for any age without a tabulated row
    pub fn qx(&self, age: u32) -> Option<f64> {
        self.ages
            .binary_search(&age)
            .ok()
            .map(|idx| self.rates[idx])
    }

    /// Clamped lookup for the simulator hot path
    ///
    /// Ages beyond the table bounds reuse the first/last tabulated rate; an
    /// age falling in an interior gap takes the nearest lower row.
    pub fn qx_clamped(&self, age: u32) -> f64 {
        // partition_point gives the number of rows with age <= target
        let upto = self.ages.partition_point(|&a| a <= age);
        if upto == 0 {
            self.rates[0]
        } else {
            self.rates[upto - 1]
        }
    }

    /// Iterate over (age, qx) rows in age order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.ages.iter().copied().zip(self.rates.iter().copied())
    }

    /// Number of tabulated rows
    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }
}
