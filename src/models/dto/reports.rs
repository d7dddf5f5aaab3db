//! Response shapes for the five reporting queries.
//!
//! Empty-result shapes are explicit constructors: a filter that matches
//! nothing produces `total_tests: 0` and zeroed numerics, never an error.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::grading::Grade;
use crate::models::dto::response::ClassTestDto;

/// Summary block shared by the class-wise and date-range reports.
///
/// `total_students` is taken from the first test's roster; when rosters
/// differ across the matched tests the figures are only approximate and
/// `approximate` is set instead of silently trusting the first element.
#[derive(Debug, Clone, Serialize)]
pub struct ClassWiseSummary {
    pub total_tests: i64,
    pub overall_average: f64,
    pub total_pass_count: i64,
    pub total_students: i64,
    pub pass_percentage: f64,
    pub approximate: bool,
}

impl ClassWiseSummary {
    pub fn empty() -> Self {
        Self {
            total_tests: 0,
            overall_average: 0.0,
            total_pass_count: 0,
            total_students: 0,
            pass_percentage: 0.0,
            approximate: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectRollup {
    pub subject_name: String,
    pub total_tests: i64,
    pub average_score: f64,
    pub highest_average: f64,
    pub lowest_average: f64,
}

#[derive(Debug, Serialize)]
pub struct ClassWiseReport {
    pub tests: Vec<ClassTestDto>,
    pub summary: ClassWiseSummary,
    pub subject_breakdown: Vec<SubjectRollup>,
}

impl ClassWiseReport {
    pub fn empty() -> Self {
        Self {
            tests: vec![],
            summary: ClassWiseSummary::empty(),
            subject_breakdown: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreHistoryEntry {
    pub test_id: String,
    pub test_name: String,
    pub test_date: DateTime<Utc>,
    pub obtained_marks: f64,
    pub total_marks: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentStanding {
    pub student_id: String,
    pub student_name: String,
    pub roll_no: String,
    pub tests_taken: i64,
    pub total_marks: f64,
    pub average_score: f64,
    pub overall_percentage: f64,
    pub rank: i64,
    pub grade: Grade,
    pub score_history: Vec<ScoreHistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassSubjectSummary {
    pub total_tests: i64,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub pass_rate: f64,
}

impl ClassSubjectSummary {
    pub fn empty() -> Self {
        Self {
            total_tests: 0,
            average_score: 0.0,
            highest_score: 0.0,
            lowest_score: 0.0,
            pass_rate: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassSubjectReport {
    pub students: Vec<StudentStanding>,
    pub summary: ClassSubjectSummary,
    pub approximate: bool,
}

impl ClassSubjectReport {
    pub fn empty() -> Self {
        Self {
            students: vec![],
            summary: ClassSubjectSummary::empty(),
            approximate: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentTestEntry {
    pub test_id: String,
    pub test_name: String,
    pub subject_name: String,
    pub test_date: DateTime<Utc>,
    pub obtained_marks: f64,
    pub total_marks: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectPerformance {
    pub subject_name: String,
    pub tests_taken: i64,
    pub average_score: f64,
    pub average_percentage: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
}

#[derive(Debug, Serialize)]
pub struct StudentSubjectReport {
    pub student_id: String,
    pub student_name: String,
    pub subjects: Vec<SubjectPerformance>,
    pub total_tests: i64,
    pub overall_average: f64,
    pub subjects_taken: i64,
    pub test_history: Vec<StudentTestEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyTrendPoint {
    pub week: String,
    pub average_score: f64,
}

#[derive(Debug, Serialize)]
pub struct DateRangeReport {
    pub tests: Vec<ClassTestDto>,
    pub summary: ClassWiseSummary,
    pub weekly_trend: Vec<WeeklyTrendPoint>,
}

impl DateRangeReport {
    pub fn empty() -> Self {
        Self {
            tests: vec![],
            summary: ClassWiseSummary::empty(),
            weekly_trend: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectAverage {
    pub subject_name: String,
    pub tests: i64,
    pub average_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PassStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedStudent {
    pub student_id: String,
    pub student_name: String,
    pub roll_no: String,
    pub tests_taken: i64,
    pub total_obtained: f64,
    pub total_possible: f64,
    pub average_percentage: f64,
    pub grade: Grade,
    pub status: PassStatus,
    pub rank: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeCount {
    pub grade: Grade,
    pub count: i64,
}

/// A metric the system cannot compute yet. The historical placeholder
/// value is carried for dashboard continuity, with `estimated` set so
/// consumers can tell it apart from real data.
#[derive(Debug, Clone, Serialize)]
pub struct StubMetric {
    pub value: Option<f64>,
    pub estimated: bool,
}

impl StubMetric {
    pub fn placeholder(value: f64) -> Self {
        Self {
            value: Some(value),
            estimated: true,
        }
    }

    pub fn absent() -> Self {
        Self {
            value: None,
            estimated: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceOverall {
    pub total_tests: i64,
    pub average_score: f64,
    pub pass_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct PerformanceReport {
    pub subject_performance: Vec<SubjectAverage>,
    pub top_performers: Vec<RankedStudent>,
    pub grade_distribution: Vec<GradeCount>,
    pub overall: PerformanceOverall,
    pub attendance_rate: StubMetric,
    pub completion_rate: StubMetric,
}

impl PerformanceReport {
    pub fn empty() -> Self {
        Self {
            subject_performance: vec![],
            top_performers: vec![],
            grade_distribution: Grade::ALL
                .iter()
                .map(|grade| GradeCount {
                    grade: *grade,
                    count: 0,
                })
                .collect(),
            overall: PerformanceOverall {
                total_tests: 0,
                average_score: 0.0,
                pass_rate: 0.0,
            },
            attendance_rate: StubMetric::absent(),
            completion_rate: StubMetric::absent(),
        }
    }
}
