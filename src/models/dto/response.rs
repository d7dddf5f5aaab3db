use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{ClassTest, MarkRecord, TestStatus, TestType};

/// Round to two decimals for presentation. Stored values stay unrounded;
/// only the wire representation is rounded.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PagedData<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassTestDto {
    pub id: String,
    pub test_name: String,
    pub test_type: TestType,
    pub test_date: DateTime<Utc>,
    pub total_marks: f64,
    pub class_id: String,
    pub class_name: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    pub subject_name: String,
    pub student_marks: Vec<MarkRecord>,
    pub average_marks: f64,
    pub highest_marks: f64,
    pub lowest_marks: f64,
    pub pass_count: i64,
    pub fail_count: i64,
    pub status: TestStatus,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ClassTest> for ClassTestDto {
    fn from(test: ClassTest) -> Self {
        ClassTestDto {
            id: test.id,
            test_name: test.test_name,
            test_type: test.test_type,
            test_date: test.test_date,
            total_marks: test.total_marks,
            class_id: test.class_id,
            class_name: test.class_name,
            section: test.section,
            subject_id: test.subject_id,
            subject_name: test.subject_name,
            student_marks: test.student_marks,
            average_marks: round2(test.average_marks),
            highest_marks: test.highest_marks,
            lowest_marks: test.lowest_marks,
            pass_count: test.pass_count,
            fail_count: test.fail_count,
            status: test.status,
            is_published: test.is_published,
            published_at: test.published_at,
            created_at: test.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteTestResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::class_test::{ClassTest, TestType};
    use chrono::TimeZone;

    #[test]
    fn test_round2() {
        assert_eq!(round2(53.756), 53.76);
        assert_eq!(round2(53.754), 53.75);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_dto_rounds_average_for_presentation() {
        let mut test = ClassTest::new_draft(
            "owner-1",
            "Quiz",
            TestType::Quiz,
            Utc.with_ymd_and_hms(2024, 11, 4, 0, 0, 0).unwrap(),
            90.0,
            "class-1",
            "Grade 8",
            "A",
            None,
            "Science",
            vec![],
        );
        // Three marks averaging to a repeating decimal.
        test.average_marks = 100.0 / 3.0;

        let dto: ClassTestDto = test.into();
        assert_eq!(dto.average_marks, 33.33);
    }

    #[test]
    fn test_api_response_envelope() {
        let response = ApiResponse::ok("Test created", 42);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Test created");
        assert_eq!(json["data"], 42);
    }
}
