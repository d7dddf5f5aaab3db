use chrono::{TimeZone, Utc};

use crate::models::domain::{ClassTest, MarkRecord, TestType};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn mark(student_id: &str, obtained: f64) -> MarkRecord {
        MarkRecord {
            student_id: student_id.to_string(),
            student_name: format!("Student {}", student_id),
            roll_no: student_id.to_string(),
            obtained_marks: obtained,
        }
    }

    /// A draft maths test for class-1 with the given roster.
    pub fn test_with_marks(total_marks: f64, marks: Vec<MarkRecord>) -> ClassTest {
        ClassTest::new_draft(
            "owner-1",
            "Unit Test 1",
            TestType::Unit,
            Utc.with_ymd_and_hms(2024, 11, 4, 0, 0, 0).unwrap(),
            total_marks,
            "class-1",
            "Grade 8",
            "A",
            None,
            "Mathematics",
            marks,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_mark() {
        let record = mark("s1", 42.0);
        assert_eq!(record.student_id, "s1");
        assert_eq!(record.obtained_marks, 42.0);
    }

    #[test]
    fn test_fixture_test_with_marks() {
        let test = test_with_marks(100.0, vec![mark("s1", 50.0), mark("s2", 70.0)]);
        assert_eq!(test.student_marks.len(), 2);
        assert_eq!(test.average_marks, 60.0);
        assert_eq!(test.class_name, "Grade 8");
    }
}
