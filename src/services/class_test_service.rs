use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ClassTest, MarkRecord, TestType},
    models::dto::request::{CreateTestRequest, ListTestsQuery, MarkEntryInput, UpdateTestRequest},
    repositories::{ClassRepository, ClassTestRepository, StudentRepository, TestListFilter},
};

/// Write path for class tests. Every mutation revalidates the mark bound,
/// recomputes the derived statistics, and applies the publish backfill
/// before anything is persisted.
pub struct ClassTestService {
    tests: Arc<dyn ClassTestRepository>,
    classes: Arc<dyn ClassRepository>,
    students: Arc<dyn StudentRepository>,
}

/// Reject any mark above the test total, naming the offending value and
/// the limit. Runs before every write; nothing is persisted on failure.
pub fn validate_mark_bounds(marks: &[MarkRecord], total_marks: f64) -> AppResult<()> {
    for mark in marks {
        if mark.obtained_marks < 0.0 {
            return Err(AppError::ValidationError(format!(
                "Obtained marks {} for '{}' cannot be negative",
                mark.obtained_marks, mark.student_name
            )));
        }
        if mark.obtained_marks > total_marks {
            return Err(AppError::ValidationError(format!(
                "Obtained marks {} for '{}' exceed the total marks {}",
                mark.obtained_marks, mark.student_name, total_marks
            )));
        }
    }
    Ok(())
}

impl ClassTestService {
    pub fn new(
        tests: Arc<dyn ClassTestRepository>,
        classes: Arc<dyn ClassRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            tests,
            classes,
            students,
        }
    }

    /// Turn request roster entries into mark records. A name given
    /// directly is taken as-is; otherwise the student id must resolve
    /// against the student lookup, which also supplies the roll number.
    async fn resolve_marks(
        &self,
        owner_id: &str,
        entries: &[MarkEntryInput],
    ) -> AppResult<Vec<MarkRecord>> {
        let mut marks = Vec::with_capacity(entries.len());

        for entry in entries {
            let record = match (&entry.student_id, &entry.student_name) {
                (Some(student_id), name) => {
                    let student = self.students.find_by_id(owner_id, student_id).await?;
                    match (student, name) {
                        (Some(student), _) => MarkRecord {
                            student_id: student_id.clone(),
                            student_name: name.clone().unwrap_or(student.name),
                            roll_no: entry.roll_no.clone().unwrap_or(student.roll_number),
                            obtained_marks: entry.obtained_marks,
                        },
                        (None, Some(name)) => MarkRecord {
                            student_id: student_id.clone(),
                            student_name: name.clone(),
                            roll_no: entry.roll_no.clone().unwrap_or_default(),
                            obtained_marks: entry.obtained_marks,
                        },
                        (None, None) => {
                            return Err(AppError::NotFound(format!(
                                "Student with id '{}' not found",
                                student_id
                            )));
                        }
                    }
                }
                (None, Some(name)) => MarkRecord {
                    // Manual roster entry; give it a stable generated id.
                    student_id: Uuid::new_v4().to_string(),
                    student_name: name.clone(),
                    roll_no: entry.roll_no.clone().unwrap_or_default(),
                    obtained_marks: entry.obtained_marks,
                },
                (None, None) => {
                    return Err(AppError::ValidationError(
                        "Each mark needs a student_name or a student_id".to_string(),
                    ));
                }
            };
            marks.push(record);
        }

        Ok(marks)
    }

    pub async fn create_test(
        &self,
        owner_id: &str,
        request: CreateTestRequest,
    ) -> AppResult<ClassTest> {
        request.validate()?;

        let class = self
            .classes
            .find_by_id(owner_id, &request.class_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Class with id '{}' not found", request.class_id))
            })?;

        let marks = self.resolve_marks(owner_id, &request.student_marks).await?;
        validate_mark_bounds(&marks, request.total_marks)?;

        let test = ClassTest::new_draft(
            owner_id,
            &request.test_name,
            request.test_type.unwrap_or(TestType::Unit),
            request.test_date,
            request.total_marks,
            &request.class_id,
            &class.class_name,
            &class.section,
            request.subject_id,
            &request.subject_name,
            marks,
        );

        // The unique compound index turns a concurrent duplicate into a 409.
        let created = self.tests.insert(test).await?;
        log::info!(
            "created test '{}' for class '{}'",
            created.test_name,
            created.class_id
        );
        Ok(created)
    }

    pub async fn update_test(
        &self,
        owner_id: &str,
        id: &str,
        request: UpdateTestRequest,
    ) -> AppResult<ClassTest> {
        request.validate()?;

        let mut test = self.get_test(owner_id, id).await?;

        if let Some(test_name) = request.test_name {
            test.test_name = test_name;
        }
        if let Some(test_type) = request.test_type {
            test.test_type = test_type;
        }
        if let Some(test_date) = request.test_date {
            test.test_date = test_date;
        }
        if let Some(total_marks) = request.total_marks {
            test.total_marks = total_marks;
        }
        if let Some(subject_id) = request.subject_id {
            test.subject_id = Some(subject_id);
        }
        if let Some(subject_name) = request.subject_name {
            test.subject_name = subject_name;
        }
        if let Some(entries) = request.student_marks {
            test.student_marks = self.resolve_marks(owner_id, &entries).await?;
        }

        // Bound check runs against the possibly-updated total.
        validate_mark_bounds(&test.student_marks, test.total_marks)?;

        let now = Utc::now();
        test.recompute_statistics();
        test.backfill_publish_state(now);
        test.touch_modified(now);

        self.tests.replace(test).await
    }

    /// Idempotent: the first publish stamps `published_at`, later calls
    /// leave it untouched.
    pub async fn publish_test(&self, owner_id: &str, id: &str) -> AppResult<ClassTest> {
        let mut test = self.get_test(owner_id, id).await?;

        let now = Utc::now();
        test.publish(now);
        test.recompute_statistics();
        test.touch_modified(now);

        self.tests.replace(test).await
    }

    pub async fn get_test(&self, owner_id: &str, id: &str) -> AppResult<ClassTest> {
        self.tests
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", id)))
    }

    pub async fn list_tests(
        &self,
        owner_id: &str,
        query: ListTestsQuery,
    ) -> AppResult<(Vec<ClassTest>, i64)> {
        let filter = TestListFilter {
            class_id: query.class_id.clone(),
            test_type: query.test_type,
            status: query.status,
        };
        self.tests
            .list(owner_id, filter, query.offset(), query.limit())
            .await
    }

    /// True removal; class tests are not soft-deleted.
    pub async fn delete_test(&self, owner_id: &str, id: &str) -> AppResult<()> {
        self.tests.delete(owner_id, id).await?;
        log::info!("deleted test '{}'", id);
        Ok(())
    }
}
