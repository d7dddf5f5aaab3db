pub mod class_test_service;
pub mod report_service;
pub mod settings_service;

pub use class_test_service::ClassTestService;
pub use report_service::ReportService;
pub use settings_service::SettingsService;
