use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A finished quiz. Written once when a session completes, never updated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub user_id: String,
    pub lesson_id: String,
    pub score: i32, // percentage, 0..=100
    pub total_questions: i32,
    pub correct_answers: i32,
    pub completion_time_minutes: i32,
    pub passed: bool,
    pub created_at: DateTime<Utc>,
}

impl Attempt {
    pub fn new(
        user_id: &str,
        lesson_id: &str,
        score: i32,
        total_questions: i32,
        correct_answers: i32,
        completion_time_minutes: i32,
        passed: bool,
    ) -> Self {
        Attempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            lesson_id: lesson_id.to_string(),
            score,
            total_questions,
            correct_answers,
            completion_time_minutes,
            passed,
            created_at: Utc::now(),
        }
    }
}
