use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{TestStatus, TestType};

/// One roster entry as supplied by the client. Either `student_name` is
/// given directly or `student_id` must resolve against the student
/// lookup; the service backfills name and roll number in the latter case.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MarkEntryInput {
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub roll_no: Option<String>,

    #[validate(range(min = 0.0, message = "Obtained marks cannot be negative"))]
    pub obtained_marks: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub test_name: String,

    pub test_type: Option<TestType>,

    pub test_date: DateTime<Utc>,

    #[validate(range(min = 1.0, message = "Total marks must be at least 1"))]
    pub total_marks: f64,

    #[validate(length(min = 1))]
    pub class_id: String,

    pub subject_id: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub subject_name: String,

    #[validate(nested)]
    pub student_marks: Vec<MarkEntryInput>,
}

/// Partial update; absent fields keep their stored values. The mark bound
/// is re-checked against the updated `total_marks` by the service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub test_name: Option<String>,

    pub test_type: Option<TestType>,

    pub test_date: Option<DateTime<Utc>>,

    #[validate(range(min = 1.0, message = "Total marks must be at least 1"))]
    pub total_marks: Option<f64>,

    pub subject_id: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub subject_name: Option<String>,

    #[validate(nested)]
    pub student_marks: Option<Vec<MarkEntryInput>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListTestsQuery {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,

    pub class_id: Option<String>,
    pub test_type: Option<TestType>,
    pub status: Option<TestStatus>,
}

impl ListTestsQuery {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DateRangeQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub class_id: Option<String>,
    pub subject_name: Option<String>,
}
