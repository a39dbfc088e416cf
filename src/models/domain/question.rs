use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub lesson_id: String,
    pub text: String,
    pub skill_type: SkillType,
    pub difficulty: Difficulty,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub question_id: String,
    pub text: String,
    pub is_correct: bool,
    pub display_order: i32, // unique per question
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Vocabulary,
    Grammar,
    ReadingComprehension,
    SentenceFormation,
    FillInBlank,
    ErrorCorrection,
}

impl SkillType {
    pub fn display_name(&self) -> &'static str {
        match self {
            SkillType::Vocabulary => "Vocabulary",
            SkillType::Grammar => "Grammar",
            SkillType::ReadingComprehension => "Reading Comprehension",
            SkillType::SentenceFormation => "Sentence Formation",
            SkillType::FillInBlank => "Fill in the Blank",
            SkillType::ErrorCorrection => "Error Correction",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Question {
    pub fn new(id: &str, lesson_id: &str, text: &str, skill_type: SkillType, order: i32) -> Self {
        Question {
            id: id.to_string(),
            lesson_id: lesson_id.to_string(),
            text: text.to_string(),
            skill_type,
            difficulty: Difficulty::Easy,
            order,
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

impl QuestionOption {
    pub fn new(id: &str, question_id: &str, text: &str, is_correct: bool, display_order: i32) -> Self {
        QuestionOption {
            id: id.to_string(),
            question_id: question_id.to_string(),
            text: text.to_string(),
            is_correct,
            display_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_type_uses_snake_case_tags() {
        let json = serde_json::to_string(&SkillType::ReadingComprehension)
            .expect("skill type should serialize");
        assert_eq!(json, "\"reading_comprehension\"");

        let parsed: SkillType =
            serde_json::from_str("\"fill_in_blank\"").expect("skill type should deserialize");
        assert_eq!(parsed, SkillType::FillInBlank);
    }

    #[test]
    fn skill_type_rejects_unknown_tag() {
        let parsed = serde_json::from_str::<SkillType>("\"essay\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn new_questions_default_to_easy() {
        let question = Question::new("q-1", "lesson-1", "Pick one", SkillType::Grammar, 1);
        assert_eq!(question.difficulty, Difficulty::Easy);

        let question = question.with_difficulty(Difficulty::Hard);
        assert_eq!(question.difficulty, Difficulty::Hard);
    }

    #[test]
    fn difficulty_uses_lowercase_tags() {
        let parsed: Difficulty =
            serde_json::from_str("\"medium\"").expect("difficulty should deserialize");
        assert_eq!(parsed, Difficulty::Medium);
    }
}
