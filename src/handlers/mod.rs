pub mod class_test_handler;
pub mod health_handler;
pub mod report_handler;
pub mod settings_handler;

pub use class_test_handler::{
    create_test, delete_test, get_test, list_tests, publish_test, update_test,
};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use report_handler::{
    class_subject_report, class_wise_report, date_range_report, performance_report, student_report,
};
pub use settings_handler::{get_grading_scale, update_grading_scale};
