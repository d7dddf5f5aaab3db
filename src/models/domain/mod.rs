pub mod school_class;
pub mod student;

pub use class_test::{ClassTest, MarkRecord, TestStatus, TestType};
pub use school_class::SchoolClass;
pub use student::Student;
