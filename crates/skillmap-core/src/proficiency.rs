//! Proficiency classification.
//!
//! The same thresholds apply to a single skill, a student's overall score and
//! the class dashboard distribution.

use std::fmt;
use std::str::FromStr;

use crate::model::ProficiencyLevel;

/// Lower bound (inclusive) of `Strong`.
pub const STRONG_MIN: f64 = 80.0;
/// Lower bound (inclusive) of `Moderate`.
pub const MODERATE_MIN: f64 = 70.0;
/// Lower bound (inclusive) of `Weak`. Anything below is `Critical`.
pub const WEAK_MIN: f64 = 50.0;

impl ProficiencyLevel {
    /// All levels, best first.
    pub const ALL: [ProficiencyLevel; 4] = [
        ProficiencyLevel::Strong,
        ProficiencyLevel::Moderate,
        ProficiencyLevel::Weak,
        ProficiencyLevel::Critical,
    ];

    /// Bucket an accuracy percentage.
    ///
    /// NaN falls through every comparison and lands in `Critical`.
    pub fn classify(accuracy: f64) -> Self {
        if accuracy >= STRONG_MIN {
            ProficiencyLevel::Strong
        } else if accuracy >= MODERATE_MIN {
            ProficiencyLevel::Moderate
        } else if accuracy >= WEAK_MIN {
            ProficiencyLevel::Weak
        } else {
            ProficiencyLevel::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProficiencyLevel::Strong => "Strong",
            ProficiencyLevel::Moderate => "Moderate",
            ProficiencyLevel::Weak => "Weak",
            ProficiencyLevel::Critical => "Critical",
        }
    }

    /// Human-readable accuracy band, e.g. `"70-79%"`.
    pub fn range_label(self) -> &'static str {
        match self {
            ProficiencyLevel::Strong => ">=80%",
            ProficiencyLevel::Moderate => "70-79%",
            ProficiencyLevel::Weak => "50-69%",
            ProficiencyLevel::Critical => "<50%",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strong" => Ok(ProficiencyLevel::Strong),
            "moderate" => Ok(ProficiencyLevel::Moderate),
            "weak" => Ok(ProficiencyLevel::Weak),
            "critical" => Ok(ProficiencyLevel::Critical),
            other => Err(format!("unknown proficiency level: {other}")),
        }
    }
}

/// Percentage of `earned` over `possible`, 0 when nothing was possible.
pub fn accuracy(earned: f64, possible: f64) -> f64 {
    if possible > 0.0 {
        earned / possible * 100.0
    } else {
        0.0
    }
}
