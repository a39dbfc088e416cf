use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{
    quiz_session::SessionProgress, Attempt, Difficulty, QuestionOption, QuestionSnapshot,
    QuizSession, SkillType,
};

/// An option as shown to the learner. Correctness is never exposed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub option_id: String,
    pub option_text: String,
    pub option_order: i32,
}

impl From<&QuestionOption> for OptionView {
    fn from(option: &QuestionOption) -> Self {
        OptionView {
            option_id: option.id.clone(),
            option_text: option.text.clone(),
            option_order: option.display_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub question_id: String,
    pub question_text: String,
    pub question_type: SkillType,
    pub skill_label: &'static str,
    pub difficulty_level: Difficulty,
    pub options: Vec<OptionView>,
}

impl From<&QuestionSnapshot> for QuestionView {
    fn from(snapshot: &QuestionSnapshot) -> Self {
        let question = &snapshot.question;
        QuestionView {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            question_type: question.skill_type,
            skill_label: question.skill_type.display_name(),
            difficulty_level: question.difficulty,
            options: snapshot.options.iter().map(OptionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub lesson_id: String,
    pub lesson_name: String,
    pub total_questions: usize,
    pub current_question_index: usize,
    pub estimated_time_minutes: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartQuizResponse {
    pub session: SessionSummary,
    pub question: QuestionView,
    /// True when an unfinished quiz for the same learner was discarded.
    pub replaced_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRef {
    pub option_id: Option<String>,
    pub option_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub question_id: String,
    pub question_text: String,
    pub question_type: SkillType,
    pub submitted_answer: AnswerRef,
    pub correct_answer: AnswerRef,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpgrade {
    pub level_id: String,
    pub level_name: String,
}

/// Everything known about a finished quiz. Built once by scoring and then
/// returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub user_id: String,
    pub lesson_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<String>,
    pub score_percentage: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub completion_time_minutes: u32,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_level: Option<LevelUpgrade>,
    pub detailed_results: Vec<QuestionReview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitAnswerResponse {
    /// The question already had an answer; nothing changed.
    Rejected { question_id: String, message: String },
    NextQuestion {
        is_correct: bool,
        progress: SessionProgress,
        question: Option<QuestionView>,
    },
    Completed { is_correct: bool, result: QuizResult },
}

impl SubmitAnswerResponse {
    pub fn accepted(&self) -> bool {
        !matches!(self, SubmitAnswerResponse::Rejected { .. })
    }

    pub fn is_correct(&self) -> Option<bool> {
        match self {
            SubmitAnswerResponse::Rejected { .. } => None,
            SubmitAnswerResponse::NextQuestion { is_correct, .. }
            | SubmitAnswerResponse::Completed { is_correct, .. } => Some(*is_correct),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizProgressResponse {
    Active {
        progress: SessionProgress,
        question: Option<QuestionView>,
    },
    NoActiveSession,
}

impl From<&QuizSession> for QuizProgressResponse {
    fn from(session: &QuizSession) -> Self {
        QuizProgressResponse::Active {
            progress: session.progress(),
            question: session.current_question().map(QuestionView::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbandonQuizResponse {
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptHistoryEntry {
    pub attempt_id: String,
    pub lesson_id: String,
    pub lesson_name: String,
    pub score_percentage: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub completion_time_minutes: i32,
    pub attempt_date: DateTime<Utc>,
    pub passing_score: bool,
}

impl AttemptHistoryEntry {
    pub fn new(attempt: Attempt, lesson_name: String) -> Self {
        AttemptHistoryEntry {
            attempt_id: attempt.id,
            lesson_id: attempt.lesson_id,
            lesson_name,
            score_percentage: attempt.score,
            correct_answers: attempt.correct_answers,
            total_questions: attempt.total_questions,
            completion_time_minutes: attempt.completion_time_minutes,
            attempt_date: attempt.created_at,
            passing_score: attempt.passed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::lesson_snapshot;

    #[test]
    fn question_view_hides_correctness() {
        let snapshot = &lesson_snapshot("lesson-1", 1)[0];
        let view = QuestionView::from(snapshot);

        let json = serde_json::to_value(&view).expect("view should serialize");
        let options = json["options"].as_array().expect("options array");
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| o.get("is_correct").is_none()));
        assert_eq!(json["question_type"], "vocabulary");
    }

    #[test]
    fn question_view_reports_each_difficulty() {
        let levels: Vec<_> = lesson_snapshot("lesson-1", 3)
            .iter()
            .map(|snapshot| {
                let json = serde_json::to_value(QuestionView::from(snapshot))
                    .expect("view should serialize");
                json["difficulty_level"].clone()
            })
            .collect();

        assert_eq!(levels, vec!["easy", "medium", "hard"]);
    }

    #[test]
    fn submit_response_is_tagged_by_status() {
        let rejected = SubmitAnswerResponse::Rejected {
            question_id: "q-1".to_string(),
            message: "Question already answered".to_string(),
        };

        let json = serde_json::to_value(&rejected).expect("response should serialize");
        assert_eq!(json["status"], "rejected");
        assert!(!rejected.accepted());
        assert_eq!(rejected.is_correct(), None);
    }

    #[test]
    fn no_active_session_serializes_as_bare_status() {
        let json = serde_json::to_value(QuizProgressResponse::NoActiveSession)
            .expect("response should serialize");
        assert_eq!(json, serde_json::json!({ "status": "no_active_session" }));
    }
}
