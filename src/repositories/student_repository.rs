use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

#[cfg(test)]
use mockall::automock;

use crate::{db::Database, errors::AppResult, models::domain::Student};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<Student>>;
}

pub struct MongoStudentRepository {
    collection: Collection<Student>,
}

impl MongoStudentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("students");
        Self { collection }
    }
}

#[async_trait]
impl StudentRepository for MongoStudentRepository {
    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<Student>> {
        let student = self
            .collection
            .find_one(doc! { "id": id, "owner_id": owner_id })
            .await?;
        Ok(student)
    }
}
