pub mod class_repository;
pub mod class_test_repository;
pub mod settings_repository;
pub mod student_repository;

pub use class_repository::{ClassRepository, MongoClassRepository};
pub use class_test_repository::{ClassTestRepository, MongoClassTestRepository, TestListFilter};
pub use settings_repository::{MongoSettingsRepository, SettingsRepository};
pub use student_repository::{MongoStudentRepository, StudentRepository};

#[cfg(test)]
pub use class_repository::MockClassRepository;
#[cfg(test)]
pub use class_test_repository::MockClassTestRepository;
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
#[cfg(test)]
pub use student_repository::MockStudentRepository;
