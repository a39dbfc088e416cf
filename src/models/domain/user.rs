use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A learner. Quiz access and progression are driven by `current_level_id`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub current_level_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: &str, username: &str, email: &str, current_level_id: &str) -> Self {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            current_level_id: current_level_id.to_string(),
            created_at: Some(Utc::now()),
        }
    }
}
