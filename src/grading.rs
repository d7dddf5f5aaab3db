//! Letter-grade policy shared by every report.
//!
//! The percentage-to-grade mapping lives here and only here; the report
//! code never carries its own band table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{AppError, AppResult};

/// A score below this percentage of the total fails the test.
pub const PASS_THRESHOLD_PERCENT: f64 = 33.0;

/// Fraction of `total_marks` a student must reach to pass.
pub const PASS_MARK_RATIO: f64 = 0.33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    /// Every band, best first. Grade distributions are zero-initialized
    /// from this list so absent grades still show up as 0.
    pub const ALL: [Grade; 7] = [
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a percentage in [0, 100] to its letter grade.
///
/// Total over the whole range: every percentage lands in exactly one band.
pub fn grade_for_percentage(percentage: f64) -> Grade {
    if percentage >= 90.0 {
        Grade::APlus
    } else if percentage >= 80.0 {
        Grade::A
    } else if percentage >= 70.0 {
        Grade::BPlus
    } else if percentage >= 60.0 {
        Grade::B
    } else if percentage >= 50.0 {
        Grade::C
    } else if percentage >= PASS_THRESHOLD_PERCENT {
        Grade::D
    } else {
        Grade::F
    }
}

pub fn is_passing(percentage: f64) -> bool {
    percentage >= PASS_THRESHOLD_PERCENT
}

/// One configurable band: `[min_percentage, max_percentage)` except the
/// topmost band, which is closed at 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub grade: Grade,
    pub min_percentage: f64,
    pub max_percentage: f64,
}

/// An owner-configurable grading scale, as managed by the marks-grading
/// settings screen. Reports run on the default scale; the settings path
/// validates any replacement before it is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingScale {
    pub bands: Vec<GradeBand>,
}

impl Default for GradingScale {
    fn default() -> Self {
        let bands = vec![
            GradeBand {
                grade: Grade::APlus,
                min_percentage: 90.0,
                max_percentage: 100.0,
            },
            GradeBand {
                grade: Grade::A,
                min_percentage: 80.0,
                max_percentage: 90.0,
            },
            GradeBand {
                grade: Grade::BPlus,
                min_percentage: 70.0,
                max_percentage: 80.0,
            },
            GradeBand {
                grade: Grade::B,
                min_percentage: 60.0,
                max_percentage: 70.0,
            },
            GradeBand {
                grade: Grade::C,
                min_percentage: 50.0,
                max_percentage: 60.0,
            },
            GradeBand {
                grade: Grade::D,
                min_percentage: PASS_THRESHOLD_PERCENT,
                max_percentage: 50.0,
            },
            GradeBand {
                grade: Grade::F,
                min_percentage: 0.0,
                max_percentage: PASS_THRESHOLD_PERCENT,
            },
        ];

        Self { bands }
    }
}

impl GradingScale {
    /// Bands must tile [0, 100] exactly: no gaps, no overlaps, in
    /// descending order from the top band down to zero.
    pub fn validate(&self) -> AppResult<()> {
        if self.bands.is_empty() {
            return Err(AppError::ValidationError(
                "Grading scale must define at least one band".to_string(),
            ));
        }

        let mut sorted = self.bands.clone();
        sorted.sort_by(|a, b| {
            b.min_percentage
                .partial_cmp(&a.min_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for band in &sorted {
            if band.min_percentage >= band.max_percentage {
                return Err(AppError::ValidationError(format!(
                    "Band '{}' is empty: min {} is not below max {}",
                    band.grade, band.min_percentage, band.max_percentage
                )));
            }
        }

        if sorted[0].max_percentage != 100.0 {
            return Err(AppError::ValidationError(format!(
                "Top band '{}' must reach 100, ends at {}",
                sorted[0].grade, sorted[0].max_percentage
            )));
        }

        if sorted[sorted.len() - 1].min_percentage != 0.0 {
            return Err(AppError::ValidationError(format!(
                "Bottom band '{}' must start at 0, starts at {}",
                sorted[sorted.len() - 1].grade,
                sorted[sorted.len() - 1].min_percentage
            )));
        }

        for pair in sorted.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if lower.max_percentage < upper.min_percentage {
                return Err(AppError::ValidationError(format!(
                    "Gap between bands '{}' and '{}': {} to {} is uncovered",
                    lower.grade, upper.grade, lower.max_percentage, upper.min_percentage
                )));
            }
            if lower.max_percentage > upper.min_percentage {
                return Err(AppError::ValidationError(format!(
                    "Bands '{}' and '{}' overlap between {} and {}",
                    lower.grade, upper.grade, upper.min_percentage, lower.max_percentage
                )));
            }
        }

        Ok(())
    }

    pub fn grade_for(&self, percentage: f64) -> Grade {
        for band in &self.bands {
            if percentage >= band.min_percentage
                && (percentage < band.max_percentage || band.max_percentage == 100.0)
            {
                return band.grade;
            }
        }
        Grade::F
    }
}
