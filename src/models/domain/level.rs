use serde::{Deserialize, Serialize};

/// A proficiency level. Levels are ranked by `order`, lowest first.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Level {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: i32,
}

impl Level {
    pub fn new(id: &str, name: &str, order: i32) -> Self {
        Level {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            order,
        }
    }

    /// The level that directly follows `self` in `levels`, if any.
    pub fn next_in<'a>(&self, levels: &'a [Level]) -> Option<&'a Level> {
        levels
            .iter()
            .filter(|level| level.order > self.order)
            .min_by_key(|level| level.order)
    }
}
