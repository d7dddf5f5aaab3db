use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoClassRepository, MongoClassTestRepository, MongoSettingsRepository,
        MongoStudentRepository,
    },
    services::{ClassTestService, ReportService, SettingsService},
};

#[derive(Clone)]
pub struct AppState {
    pub class_test_service: Arc<ClassTestService>,
    pub report_service: Arc<ReportService>,
    pub settings_service: Arc<SettingsService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let test_repository = Arc::new(MongoClassTestRepository::new(&db));
        test_repository.ensure_indexes().await?;

        let settings_repository = Arc::new(MongoSettingsRepository::new(&db));
        settings_repository.ensure_indexes().await?;

        let class_repository = Arc::new(MongoClassRepository::new(&db));
        let student_repository = Arc::new(MongoStudentRepository::new(&db));

        let class_test_service = Arc::new(ClassTestService::new(
            test_repository.clone(),
            class_repository.clone(),
            student_repository.clone(),
        ));
        let report_service = Arc::new(ReportService::new(
            test_repository,
            class_repository,
            student_repository,
        ));
        let settings_service = Arc::new(SettingsService::new(settings_repository));

        Ok(Self {
            class_test_service,
            report_service,
            settings_service,
            db,
            config: Arc::new(config),
        })
    }
}
