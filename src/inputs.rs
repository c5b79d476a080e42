//! Bounded numeric inputs for the estimator.

use crate::score::{lew_score, LewScore};

/// A labelled numeric input restricted to `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    value: f64,
}

impl Slider {
    /// Create a slider positioned at its default.
    pub const fn new(label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            label,
            min,
            max,
            default,
            value: default,
        }
    }

    /// Current value, always within bounds.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Move the slider, clamping into range. NaN resets to the default.
    pub fn set(&mut self, value: f64) {
        self.value = if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        };
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The three inputs to the LEW score.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub life_expectancy: Slider,
    pub wellby: Slider,
    pub risk_adjustment: Slider,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            life_expectancy: Slider::new(
                "Estimated Remaining Life Expectancy (years)",
                0.0,
                120.0,
                40.0,
            ),
            wellby: Slider::new("WELLBY Score (0-10)", 0.0, 10.0, 7.0),
            risk_adjustment: Slider::new("Risk Adjustment Factor (0.0-1.0)", 0.0, 1.0, 0.85),
        }
    }
}

impl Inputs {
    /// Build inputs from raw values, clamping each into its range.
    pub fn with_values(life_expectancy: f64, wellby: f64, risk_adjustment: f64) -> Self {
        let mut inputs = Self::default();
        inputs.life_expectancy.set(life_expectancy);
        inputs.wellby.set(wellby);
        inputs.risk_adjustment.set(risk_adjustment);
        inputs
    }

    pub fn life_expectancy(&self) -> f64 {
        self.life_expectancy.value()
    }

    pub fn wellby(&self) -> f64 {
        self.wellby.value()
    }

    pub fn risk_adjustment(&self) -> f64 {
        self.risk_adjustment.value()
    }

    /// The LEW score for the current values.
    pub fn score(&self) -> LewScore {
        lew_score(self.life_expectancy(), self.wellby(), self.risk_adjustment())
    }

    /// Mutable access to every slider, in display order.
    pub fn sliders_mut(&mut self) -> [&mut Slider; 3] {
        [
            &mut self.life_expectancy,
            &mut self.wellby,
            &mut self.risk_adjustment,
        ]
    }
}
