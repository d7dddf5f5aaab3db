//! In-memory repository implementations shared by the integration
//! suites. They mirror the Mongo repositories' contracts, including the
//! compound uniqueness the real collection enforces with its index.

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;

use gradebook_server::{
    errors::{AppError, AppResult},
    models::domain::{ClassTest, MarkRecord, SchoolClass, Student, TestType},
    repositories::{ClassRepository, ClassTestRepository, StudentRepository, TestListFilter},
};

pub struct InMemoryClassTestRepository {
    tests: Arc<RwLock<HashMap<String, ClassTest>>>,
}

impl InMemoryClassTestRepository {
    pub fn new() -> Self {
        Self {
            tests: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ClassTestRepository for InMemoryClassTestRepository {
    async fn insert(&self, test: ClassTest) -> AppResult<ClassTest> {
        let mut tests = self.tests.write().await;

        // Same guard as the unique compound index on the collection.
        let duplicate = tests.values().any(|t| {
            t.owner_id == test.owner_id
                && t.class_id == test.class_id
                && t.subject_name == test.subject_name
                && t.test_date == test.test_date
        });
        if duplicate {
            return Err(AppError::AlreadyExists(format!(
                "A test for class '{}', subject '{}' on {} already exists",
                test.class_id,
                test.subject_name,
                test.test_date.format("%Y-%m-%d")
            )));
        }

        tests.insert(test.id.clone(), test.clone());
        Ok(test)
    }

    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<ClassTest>> {
        let tests = self.tests.read().await;
        Ok(tests
            .get(id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn list(
        &self,
        owner_id: &str,
        filter: TestListFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ClassTest>, i64)> {
        let tests = self.tests.read().await;
        let mut items: Vec<ClassTest> = tests
            .values()
            .filter(|t| t.owner_id == owner_id)
            .filter(|t| {
                filter
                    .class_id
                    .as_ref()
                    .map(|c| &t.class_id == c)
                    .unwrap_or(true)
            })
            .filter(|t| filter.test_type.map(|ty| t.test_type == ty).unwrap_or(true))
            .filter(|t| filter.status.map(|s| t.status == s).unwrap_or(true))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.test_date.cmp(&a.test_date));

        let total = items.len() as i64;
        let start = offset.max(0) as usize;
        let end = (start + limit.max(0) as usize).min(items.len());

        let page = if start >= items.len() {
            vec![]
        } else {
            items[start..end].to_vec()
        };

        Ok((page, total))
    }

    async fn find_published_by_class(
        &self,
        owner_id: &str,
        class_id: &str,
    ) -> AppResult<Vec<ClassTest>> {
        let tests = self.tests.read().await;
        let mut items: Vec<ClassTest> = tests
            .values()
            .filter(|t| t.owner_id == owner_id && t.class_id == class_id && t.is_published)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.test_date.cmp(&a.test_date));
        Ok(items)
    }

    async fn find_published_by_class_subject(
        &self,
        owner_id: &str,
        class_id: &str,
        subject_name: &str,
    ) -> AppResult<Vec<ClassTest>> {
        let tests = self.tests.read().await;
        let mut items: Vec<ClassTest> = tests
            .values()
            .filter(|t| {
                t.owner_id == owner_id
                    && t.class_id == class_id
                    && t.subject_name == subject_name
                    && t.is_published
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.test_date.cmp(&a.test_date));
        Ok(items)
    }

    async fn find_published_for_student(
        &self,
        owner_id: &str,
        student_id: &str,
    ) -> AppResult<Vec<ClassTest>> {
        let tests = self.tests.read().await;
        let mut items: Vec<ClassTest> = tests
            .values()
            .filter(|t| {
                t.owner_id == owner_id
                    && t.is_published
                    && t.student_marks.iter().any(|m| m.student_id == student_id)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.test_date.cmp(&a.test_date));
        Ok(items)
    }

    async fn find_published_in_range(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        class_id: Option<String>,
        subject_name: Option<String>,
    ) -> AppResult<Vec<ClassTest>> {
        let tests = self.tests.read().await;
        let mut items: Vec<ClassTest> = tests
            .values()
            .filter(|t| t.owner_id == owner_id && t.is_published)
            .filter(|t| t.test_date >= start && t.test_date <= end)
            .filter(|t| class_id.as_ref().map(|c| &t.class_id == c).unwrap_or(true))
            .filter(|t| {
                subject_name
                    .as_ref()
                    .map(|s| &t.subject_name == s)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| a.test_date.cmp(&b.test_date));
        Ok(items)
    }

    async fn replace(&self, test: ClassTest) -> AppResult<ClassTest> {
        let mut tests = self.tests.write().await;
        match tests.get(&test.id) {
            Some(existing) if existing.owner_id == test.owner_id => {
                tests.insert(test.id.clone(), test.clone());
                Ok(test)
            }
            _ => Err(AppError::NotFound(format!(
                "Test with id '{}' not found",
                test.id
            ))),
        }
    }

    async fn delete(&self, owner_id: &str, id: &str) -> AppResult<()> {
        let mut tests = self.tests.write().await;
        match tests.get(id) {
            Some(existing) if existing.owner_id == owner_id => {
                tests.remove(id);
                Ok(())
            }
            _ => Err(AppError::NotFound(format!(
                "Test with id '{}' not found",
                id
            ))),
        }
    }
}

pub struct InMemoryClassRepository {
    classes: HashMap<String, SchoolClass>,
}

impl InMemoryClassRepository {
    pub fn with_classes(classes: Vec<SchoolClass>) -> Self {
        Self {
            classes: classes.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }
}

#[async_trait]
impl ClassRepository for InMemoryClassRepository {
    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<SchoolClass>> {
        Ok(self
            .classes
            .get(id)
            .filter(|c| c.owner_id == owner_id)
            .cloned())
    }
}

pub struct InMemoryStudentRepository {
    students: HashMap<String, Student>,
}

impl InMemoryStudentRepository {
    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            students: students.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<Student>> {
        Ok(self
            .students
            .get(id)
            .filter(|s| s.owner_id == owner_id)
            .cloned())
    }
}

pub fn mark(student_id: &str, name: &str, roll_no: &str, obtained: f64) -> MarkRecord {
    MarkRecord {
        student_id: student_id.to_string(),
        student_name: name.to_string(),
        roll_no: roll_no.to_string(),
        obtained_marks: obtained,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

#[allow(clippy::too_many_arguments)]
pub fn make_test(
    id: &str,
    owner_id: &str,
    class_id: &str,
    subject_name: &str,
    test_date: DateTime<Utc>,
    total_marks: f64,
    marks: Vec<MarkRecord>,
    published: bool,
) -> ClassTest {
    let mut test = ClassTest::new_draft(
        owner_id,
        &format!("{} test {}", subject_name, id),
        TestType::Unit,
        test_date,
        total_marks,
        class_id,
        "Grade 8",
        "A",
        None,
        subject_name,
        marks,
    );
    test.id = id.to_string();
    if published {
        test.publish(test_date);
    }
    test
}

pub fn school_class(id: &str, owner_id: &str) -> SchoolClass {
    SchoolClass {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        class_name: "Grade 8".to_string(),
        section: "A".to_string(),
    }
}

pub fn student(id: &str, owner_id: &str, name: &str, roll_number: &str) -> Student {
    Student {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        roll_number: roll_number.to_string(),
        class_id: "class-1".to_string(),
    }
}
