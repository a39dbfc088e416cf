use serde::{Deserialize, Serialize};

fn default_estimated_time() -> i32 {
    15
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lesson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub level_id: String,
    pub order: i32,
    #[serde(default = "default_estimated_time")]
    pub estimated_time_minutes: i32,
}

impl Lesson {
    pub fn new(id: &str, name: &str, level_id: &str, order: i32) -> Self {
        Lesson {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            level_id: level_id.to_string(),
            order,
            estimated_time_minutes: default_estimated_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_estimated_time_defaults_to_fifteen_minutes() {
        let json = r#"{"id":"l-1","name":"Greetings","level_id":"beginner","order":1}"#;
        let lesson: Lesson = serde_json::from_str(json).expect("lesson should deserialize");

        assert_eq!(lesson.estimated_time_minutes, 15);
        assert!(lesson.description.is_none());
    }
}
