use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, to_bson, Document},
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

#[cfg(test)]
use mockall::automock;

use crate::{
    db::Database,
    errors::{is_duplicate_key_error, AppError, AppResult},
    models::domain::{ClassTest, TestStatus, TestType},
};

/// Optional filters for the paginated listing.
#[derive(Debug, Clone, Default)]
pub struct TestListFilter {
    pub class_id: Option<String>,
    pub test_type: Option<TestType>,
    pub status: Option<TestStatus>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClassTestRepository: Send + Sync {
    async fn insert(&self, test: ClassTest) -> AppResult<ClassTest>;
    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<ClassTest>>;
    async fn list(
        &self,
        owner_id: &str,
        filter: TestListFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ClassTest>, i64)>;
    async fn find_published_by_class(
        &self,
        owner_id: &str,
        class_id: &str,
    ) -> AppResult<Vec<ClassTest>>;
    async fn find_published_by_class_subject(
        &self,
        owner_id: &str,
        class_id: &str,
        subject_name: &str,
    ) -> AppResult<Vec<ClassTest>>;
    /// Published tests containing the student's mark, most recent first.
    async fn find_published_for_student(
        &self,
        owner_id: &str,
        student_id: &str,
    ) -> AppResult<Vec<ClassTest>>;
    /// Published tests inside the inclusive date range, ascending by date.
    async fn find_published_in_range(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        class_id: Option<String>,
        subject_name: Option<String>,
    ) -> AppResult<Vec<ClassTest>>;
    async fn replace(&self, test: ClassTest) -> AppResult<ClassTest>;
    async fn delete(&self, owner_id: &str, id: &str) -> AppResult<()>;
}

pub struct MongoClassTestRepository {
    collection: Collection<ClassTest>,
}

impl MongoClassTestRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("class_tests");
        Self { collection }
    }

    /// The compound unique index is the duplicate-test guard: the
    /// application never does a check-then-insert, the storage layer
    /// rejects the second writer.
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for class_tests collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(id_index).await?;

        let dedup_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "class_id": 1, "subject_name": 1, "test_date": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_class_subject_date_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(dedup_index).await?;

        log::info!("Successfully created indexes for class_tests collection");
        Ok(())
    }

    async fn find_sorted(&self, filter: Document, sort: Document) -> AppResult<Vec<ClassTest>> {
        use futures::TryStreamExt;

        let options = FindOptions::builder().sort(sort).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        let tests: Vec<ClassTest> = cursor.try_collect().await?;
        Ok(tests)
    }
}

#[async_trait]
impl ClassTestRepository for MongoClassTestRepository {
    async fn insert(&self, test: ClassTest) -> AppResult<ClassTest> {
        match self.collection.insert_one(&test).await {
            Ok(_) => Ok(test),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::AlreadyExists(format!(
                "A test for class '{}', subject '{}' on {} already exists",
                test.class_id,
                test.subject_name,
                test.test_date.format("%Y-%m-%d")
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<ClassTest>> {
        let test = self
            .collection
            .find_one(doc! { "id": id, "owner_id": owner_id })
            .await?;
        Ok(test)
    }

    async fn list(
        &self,
        owner_id: &str,
        filter: TestListFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ClassTest>, i64)> {
        use futures::TryStreamExt;

        let mut query = doc! { "owner_id": owner_id };
        if let Some(class_id) = filter.class_id {
            query.insert("class_id", class_id);
        }
        if let Some(test_type) = filter.test_type {
            query.insert("test_type", to_bson(&test_type)?);
        }
        if let Some(status) = filter.status {
            query.insert("status", to_bson(&status)?);
        }

        let total = self.collection.count_documents(query.clone()).await? as i64;

        let find_options = FindOptions::builder()
            .sort(doc! { "test_date": -1 })
            .skip(Some(offset.max(0) as u64))
            .limit(Some(limit))
            .build();

        let cursor = self
            .collection
            .find(query)
            .with_options(find_options)
            .await?;
        let items: Vec<ClassTest> = cursor.try_collect().await?;

        Ok((items, total))
    }

    async fn find_published_by_class(
        &self,
        owner_id: &str,
        class_id: &str,
    ) -> AppResult<Vec<ClassTest>> {
        self.find_sorted(
            doc! { "owner_id": owner_id, "class_id": class_id, "is_published": true },
            doc! { "test_date": -1 },
        )
        .await
    }

    async fn find_published_by_class_subject(
        &self,
        owner_id: &str,
        class_id: &str,
        subject_name: &str,
    ) -> AppResult<Vec<ClassTest>> {
        self.find_sorted(
            doc! {
                "owner_id": owner_id,
                "class_id": class_id,
                "subject_name": subject_name,
                "is_published": true,
            },
            doc! { "test_date": -1 },
        )
        .await
    }

    async fn find_published_for_student(
        &self,
        owner_id: &str,
        student_id: &str,
    ) -> AppResult<Vec<ClassTest>> {
        self.find_sorted(
            doc! {
                "owner_id": owner_id,
                "student_marks.student_id": student_id,
                "is_published": true,
            },
            doc! { "test_date": -1 },
        )
        .await
    }

    async fn find_published_in_range(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        class_id: Option<String>,
        subject_name: Option<String>,
    ) -> AppResult<Vec<ClassTest>> {
        // Serialize boundaries through the same serde path as the stored
        // field so the range comparison sees matching representations.
        let mut query = doc! {
            "owner_id": owner_id,
            "is_published": true,
            "test_date": { "$gte": to_bson(&start)?, "$lte": to_bson(&end)? },
        };
        if let Some(class_id) = class_id {
            query.insert("class_id", class_id);
        }
        if let Some(subject_name) = subject_name {
            query.insert("subject_name", subject_name);
        }

        self.find_sorted(query, doc! { "test_date": 1 }).await
    }

    async fn replace(&self, test: ClassTest) -> AppResult<ClassTest> {
        let filter = doc! { "id": &test.id, "owner_id": &test.owner_id };

        let result = self.collection.replace_one(filter, &test).await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Test with id '{}' not found",
                test.id
            )));
        }

        Ok(test)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> AppResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "id": id, "owner_id": owner_id })
            .await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Test with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}
