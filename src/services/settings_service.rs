use std::sync::Arc;

use crate::{
    errors::AppResult,
    grading::GradingScale,
    repositories::SettingsRepository,
};

/// Marks-grading settings. A stored scale must tile [0, 100] exactly;
/// owners without a stored scale get the default bands.
pub struct SettingsService {
    settings: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(settings: Arc<dyn SettingsRepository>) -> Self {
        Self { settings }
    }

    pub async fn get_grading_scale(&self, owner_id: &str) -> AppResult<GradingScale> {
        let stored = self.settings.get_grading_scale(owner_id).await?;
        Ok(stored.unwrap_or_default())
    }

    pub async fn update_grading_scale(
        &self,
        owner_id: &str,
        scale: GradingScale,
    ) -> AppResult<GradingScale> {
        scale.validate()?;
        self.settings
            .upsert_grading_scale(owner_id, scale.clone())
            .await?;
        Ok(scale)
    }
}
