use serde::{Deserialize, Serialize};

/// Class lookup entity. `class_name` and `section` are denormalized onto a
/// test at creation time.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchoolClass {
    pub id: String,
    pub owner_id: String,
    pub class_name: String,
    pub section: String,
}
