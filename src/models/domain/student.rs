use serde::{Deserialize, Serialize};

/// Student lookup entity, used to backfill a mark record when a request
/// supplies only the student id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Student {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub roll_number: String,
    pub class_id: String,
}
