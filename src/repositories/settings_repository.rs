use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::{db::Database, errors::AppResult, grading::GradingScale};

/// Per-owner grading scale document.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct OwnerGradingScale {
    pub owner_id: String,
    pub scale: GradingScale,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_grading_scale(&self, owner_id: &str) -> AppResult<Option<GradingScale>>;
    async fn upsert_grading_scale(&self, owner_id: &str, scale: GradingScale) -> AppResult<()>;
}

pub struct MongoSettingsRepository {
    collection: Collection<OwnerGradingScale>,
}

impl MongoSettingsRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("grading_scales");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "owner_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(model).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for MongoSettingsRepository {
    async fn get_grading_scale(&self, owner_id: &str) -> AppResult<Option<GradingScale>> {
        let stored = self
            .collection
            .find_one(doc! { "owner_id": owner_id })
            .await?;
        Ok(stored.map(|s| s.scale))
    }

    async fn upsert_grading_scale(&self, owner_id: &str, scale: GradingScale) -> AppResult<()> {
        use mongodb::options::ReplaceOptions;

        let document = OwnerGradingScale {
            owner_id: owner_id.to_string(),
            scale,
        };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(doc! { "owner_id": owner_id }, &document)
            .with_options(options)
            .await?;
        Ok(())
    }
}
