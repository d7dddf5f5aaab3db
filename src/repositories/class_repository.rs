use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

#[cfg(test)]
use mockall::automock;

use crate::{db::Database, errors::AppResult, models::domain::SchoolClass};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<SchoolClass>>;
}

pub struct MongoClassRepository {
    collection: Collection<SchoolClass>,
}

impl MongoClassRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("classes");
        Self { collection }
    }
}

#[async_trait]
impl ClassRepository for MongoClassRepository {
    async fn find_by_id(&self, owner_id: &str, id: &str) -> AppResult<Option<SchoolClass>> {
        let class = self
            .collection
            .find_one(doc! { "id": id, "owner_id": owner_id })
            .await?;
        Ok(class)
    }
}
