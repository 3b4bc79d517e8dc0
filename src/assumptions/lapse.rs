//! Baseline lapse assumption
//!
//! Ordered mapping from policy duration (1-indexed) to an annual lapse rate.
//! Durations past the table reuse the final tabulated rate, mirroring the
//! clamped mortality lookup.

use crate::error::StudyError;

/// Ordered duration -> lapse rate mapping
#[derive(Debug, Clone)]
pub struct LapseTable {
    durations: Vec<u32>,
    rates: Vec<f64>,
}

impl LapseTable {
    /// Build from ordered (duration, lapse_rate) points
    ///
    /// Durations must be strictly increasing, starting at 1 or later, and
    /// every rate must lie in [0, 1).
    pub fn from_points(points: Vec<(u32, f64)>) -> Result<Self, StudyError> {
        if points.is_empty() {
            return Err(StudyError::table("lapse", "table has no rows"));
        }

        let mut durations = Vec::with_capacity(points.len());
        let mut rates = Vec::with_capacity(points.len());

        for (duration, rate) in points {
            if duration == 0 {
                return Err(StudyError::table("lapse", "durations are 1-indexed"));
            }
            if let Some(&prev) = durations.last() {
                if duration <= prev {
                    return Err(StudyError::table(
                        "lapse",
                        format!(
                            "durations must be strictly increasing: {} after {}",
                            duration, prev
                        ),
                    ));
                }
            }
            if !(0.0..1.0).contains(&rate) {
                return Err(StudyError::table(
                    "lapse",
                    format!("lapse rate at duration {} out of range [0, 1): {}", duration, rate),
                ));
            }
            durations.push(duration);
            rates.push(rate);
        }

        Ok(Self { durations, rates })
    }

    /// Synthetic select-and-ultimate lapse pattern over durations 1..=max_duration
    ///
    /// 8% in year 1, 5% in year 2, 3% through year 5, 1.5% thereafter
    pub fn synthetic(max_duration: u32) -> Self {
        let durations: Vec<u32> = (1..=max_duration.max(1)).collect();
        let rates = durations
            .iter()
            .map(|&d| match d {
                1 => 0.08,
                2 => 0.05,
                3..=5 => 0.03,
                _ => 0.015,
            })
            .collect();
        Self { durations, rates }
    }

    /// Highest tabulated duration
    pub fn max_duration(&self) -> u32 {
        self.durations.last().copied().unwrap_or(0)
    }

    /// Clamped lookup: durations beyond the table reuse the final rate,
    /// interior gaps take the nearest lower row
    pub fn rate_clamped(&self, duration: u32) -> f64 {
        let upto = self.durations.partition_point(|&d| d <= duration);
        if upto == 0 {
            self.rates[0]
        } else {
            self.rates[upto - 1]
        }
    }

    /// Iterate over (duration, lapse_rate) rows in duration order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.durations
            .iter()
            .copied()
            .zip(self.rates.iter().copied())
    }

    /// Number of tabulated rows
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}
