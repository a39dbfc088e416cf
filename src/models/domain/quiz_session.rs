use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Lesson, Question, QuestionOption},
};

/// A question together with its options, frozen when the quiz starts.
/// Grading always reads from this copy, never from the content store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionSnapshot {
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

impl QuestionSnapshot {
    pub fn new(question: Question, mut options: Vec<QuestionOption>) -> Self {
        options.sort_by_key(|option| option.display_order);
        Self { question, options }
    }

    pub fn id(&self) -> &str {
        &self.question.id
    }

    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.is_correct)
    }

    pub fn correct_option_count(&self) -> usize {
        self.options.iter().filter(|option| option.is_correct).count()
    }

    /// Whether `option_id` is one of this question's options and is marked correct.
    pub fn is_correct_choice(&self, option_id: &str) -> bool {
        self.option(option_id).is_some_and(|option| option.is_correct)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    InProgress,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub lesson_id: String,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub answered_questions: usize,
    pub quiz_complete: bool,
}

/// One learner's pass through one lesson's questions.
///
/// A session is born `InProgress` with the cursor on the first question and
/// moves to `Completed` on its own once every question has an answer.
/// `Completed` is terminal.
#[derive(Clone, Debug)]
pub struct QuizSession {
    id: String,
    subject_id: String,
    lesson_id: String,
    lesson_name: String,
    questions: Vec<QuestionSnapshot>,
    answers: HashMap<String, String>,
    cursor: usize,
    started_at: DateTime<Utc>,
    phase: SessionPhase,
}

impl QuizSession {
    pub fn new(
        subject_id: &str,
        lesson: &Lesson,
        questions: Vec<QuestionSnapshot>,
        started_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if questions.is_empty() {
            return Err(AppError::NotFound(format!(
                "Lesson '{}' has no questions",
                lesson.id
            )));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            lesson_id: lesson.id.clone(),
            lesson_name: lesson.name.clone(),
            questions,
            answers: HashMap::new(),
            cursor: 0,
            started_at,
            phase: SessionPhase::InProgress,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn lesson_id(&self) -> &str {
        &self.lesson_id
    }

    pub fn lesson_name(&self) -> &str {
        &self.lesson_name
    }

    pub fn questions(&self) -> &[QuestionSnapshot] {
        &self.questions
    }

    pub fn answers(&self) -> &HashMap<String, String> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    pub fn question(&self, question_id: &str) -> Option<&QuestionSnapshot> {
        self.questions.iter().find(|q| q.id() == question_id)
    }

    pub fn current_question(&self) -> Option<&QuestionSnapshot> {
        self.questions.get(self.cursor)
    }

    /// Records an answer. The first answer for a question wins: a second
    /// submission fails with `AlreadyAnswered` and leaves the session as it was.
    /// Returns the phase after the submission.
    pub fn submit_answer(&mut self, question_id: &str, option_id: &str) -> AppResult<SessionPhase> {
        if self.phase == SessionPhase::Completed {
            return Err(AppError::InvalidState(format!(
                "Quiz for lesson '{}' is already completed",
                self.lesson_id
            )));
        }

        let question = self.question(question_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Question '{}' is not part of lesson '{}'",
                question_id, self.lesson_id
            ))
        })?;

        if question.option(option_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Option '{}' does not belong to question '{}'",
                option_id, question_id
            )));
        }

        if self.answers.contains_key(question_id) {
            return Err(AppError::AlreadyAnswered(format!(
                "Question '{}' was already answered",
                question_id
            )));
        }

        self.answers
            .insert(question_id.to_string(), option_id.to_string());

        if self.is_complete() {
            self.phase = SessionPhase::Completed;
        }

        Ok(self.phase)
    }

    /// Moves the cursor to the next unanswered question: the first one after
    /// the cursor, otherwise the first one before it. The cursor stays put
    /// when no other question is open or the quiz is complete.
    /// Returns false when the cursor did not move.
    pub fn advance(&mut self) -> bool {
        if self.phase == SessionPhase::Completed {
            return false;
        }

        let is_open = |index: &usize| !self.answers.contains_key(self.questions[*index].id());
        let next = (self.cursor + 1..self.questions.len())
            .find(is_open)
            .or_else(|| (0..self.cursor).find(is_open));

        match next {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            lesson_id: self.lesson_id.clone(),
            current_question_index: self.cursor,
            total_questions: self.total_questions(),
            answered_questions: self.answered_count(),
            quiz_complete: self.is_complete(),
        }
    }
}
