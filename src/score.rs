//! The LEW (Life-Enhanced Wellbeing) score.

use std::fmt;

/// A LEW score, already rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LewScore(f64);

impl LewScore {
    /// The rounded score value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for LewScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Compute `life_expectancy * wellby * risk_adjustment`, rounded to two decimals.
pub fn lew_score(life_expectancy: f64, wellby: f64, risk_adjustment: f64) -> LewScore {
    LewScore(round2(life_expectancy * wellby * risk_adjustment))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
