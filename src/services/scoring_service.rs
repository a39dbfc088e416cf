use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Level, QuizSession, SessionPhase},
        dto::response::{AnswerRef, QuestionReview, QuizResult},
    },
};

/// Minimum percentage for a lesson to count as passed.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

pub struct ScoringService;

impl ScoringService {
    /// Integer percentage, truncated. Zero questions score zero.
    pub fn percentage(correct: u32, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        correct * 100 / total
    }

    pub fn is_passing(percentage: u32) -> bool {
        percentage >= PASS_THRESHOLD_PERCENT
    }

    /// Whole minutes between `started_at` and `finished_at`, never negative.
    pub fn completion_minutes(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> u32 {
        let minutes = (finished_at - started_at).num_minutes().max(0);
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }

    /// Grades a completed session against its own question snapshot.
    /// Unanswered questions count as incorrect.
    pub fn score(session: &QuizSession, finished_at: DateTime<Utc>) -> AppResult<QuizResult> {
        if session.phase() != SessionPhase::Completed {
            return Err(AppError::InvalidState(format!(
                "Quiz for lesson '{}' is not complete",
                session.lesson_id()
            )));
        }

        let mut detailed_results = Vec::with_capacity(session.total_questions());
        let mut correct_answers = 0u32;

        for snapshot in session.questions() {
            let submitted = session
                .answer_for(snapshot.id())
                .and_then(|option_id| snapshot.option(option_id));
            let is_correct = submitted.is_some_and(|option| option.is_correct);
            if is_correct {
                correct_answers += 1;
            }

            let correct = snapshot.correct_option();
            detailed_results.push(QuestionReview {
                question_id: snapshot.question.id.clone(),
                question_text: snapshot.question.text.clone(),
                question_type: snapshot.question.skill_type,
                submitted_answer: AnswerRef {
                    option_id: submitted.map(|o| o.id.clone()),
                    option_text: submitted.map(|o| o.text.clone()),
                },
                correct_answer: AnswerRef {
                    option_id: correct.map(|o| o.id.clone()),
                    option_text: correct.map(|o| o.text.clone()),
                },
                is_correct,
            });
        }

        let total_questions = session.total_questions() as u32;
        let score_percentage = Self::percentage(correct_answers, total_questions);

        Ok(QuizResult {
            user_id: session.subject_id().to_string(),
            lesson_id: session.lesson_id().to_string(),
            attempt_id: None,
            score_percentage,
            correct_answers,
            total_questions,
            completion_time_minutes: Self::completion_minutes(session.started_at(), finished_at),
            passed: Self::is_passing(score_percentage),
            new_level: None,
            detailed_results,
        })
    }

    /// The level a learner moves up to, given whether each lesson of their
    /// current level has a passing attempt. `None` when some lesson is still
    /// unpassed or the learner is already at the top level.
    pub fn upgrade_target<'a>(
        current: &Level,
        levels: &'a [Level],
        lessons_passed: &[bool],
    ) -> Option<&'a Level> {
        if !lessons_passed.iter().all(|passed| *passed) {
            return None;
        }
        current.next_in(levels)
    }
}
