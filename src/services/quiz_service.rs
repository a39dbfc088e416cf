use std::{collections::HashMap, sync::Arc};

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Attempt, Lesson, QuestionSnapshot, QuizSession, SessionPhase, User},
        dto::response::{
            AbandonQuizResponse, AttemptHistoryEntry, LevelUpgrade, QuestionView,
            QuizProgressResponse, QuizResult, SessionSummary, StartQuizResponse,
            SubmitAnswerResponse,
        },
    },
    repositories::{AttemptRepository, ContentRepository, UserRepository},
    services::{scoring_service::ScoringService, session_registry::SessionRegistry},
};

/// Entry point for everything quiz related. Each operation runs while holding
/// the learner's registry slot, so two requests from the same learner are
/// applied one after the other.
pub struct QuizService {
    content: Arc<dyn ContentRepository>,
    users: Arc<dyn UserRepository>,
    attempts: Arc<dyn AttemptRepository>,
    registry: Arc<SessionRegistry>,
}

impl QuizService {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        users: Arc<dyn UserRepository>,
        attempts: Arc<dyn AttemptRepository>,
        registry: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            content,
            users,
            attempts,
            registry,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Starts a quiz on `lesson_id`. Any unfinished quiz of the learner is
    /// discarded; `replaced_previous` tells the caller it happened.
    pub async fn start_quiz(&self, subject_id: &str, lesson_id: &str) -> AppResult<StartQuizResponse> {
        let user = self
            .users
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", subject_id)))?;

        let lesson = self
            .content
            .find_lesson(lesson_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson with id '{}' not found", lesson_id)))?;

        self.check_access(&user, &lesson).await?;

        let questions = self.load_snapshot(&lesson).await?;
        let session = QuizSession::new(subject_id, &lesson, questions, Utc::now())?;

        let question = session
            .current_question()
            .map(QuestionView::from)
            .ok_or_else(|| AppError::InternalError("New quiz has no first question".to_string()))?;
        let summary = SessionSummary {
            lesson_id: lesson.id.clone(),
            lesson_name: lesson.name.clone(),
            total_questions: session.total_questions(),
            current_question_index: session.cursor(),
            estimated_time_minutes: lesson.estimated_time_minutes,
        };
        let session_id = session.id().to_string();

        let replaced = {
            let mut slot = self.registry.lock(subject_id).await;
            slot.replace(session)
        };

        if let Some(previous) = &replaced {
            log::info!(
                "Discarded unfinished quiz {} (lesson {}) for user {}",
                previous.id(),
                previous.lesson_id(),
                subject_id
            );
        }
        log::info!(
            "Started quiz {} for user {} on lesson {} ({} questions)",
            session_id,
            subject_id,
            lesson.id,
            summary.total_questions
        );

        Ok(StartQuizResponse {
            session: summary,
            question,
            replaced_previous: replaced.is_some(),
        })
    }

    /// Records an answer for the learner's active quiz. Answering the last
    /// open question scores the quiz, removes it and stores the attempt.
    pub async fn submit_answer(
        &self,
        subject_id: &str,
        question_id: &str,
        option_id: &str,
    ) -> AppResult<SubmitAnswerResponse> {
        let mut slot = self.registry.lock(subject_id).await;
        let outcome = self
            .apply_answer(&mut slot, question_id, option_id)
            .await;
        drop(slot);

        self.registry.release(subject_id).await;
        outcome
    }

    pub async fn get_progress(&self, subject_id: &str) -> QuizProgressResponse {
        match self.registry.get(subject_id).await {
            Some(session) => QuizProgressResponse::from(&session),
            None => QuizProgressResponse::NoActiveSession,
        }
    }

    /// Drops the learner's quiz without scoring it.
    pub async fn abandon_quiz(&self, subject_id: &str) -> AbandonQuizResponse {
        let removed = self.registry.remove(subject_id).await;
        if removed {
            log::info!("User {} abandoned their quiz", subject_id);
        }
        AbandonQuizResponse { removed }
    }

    pub async fn get_history(&self, subject_id: &str, limit: i64) -> AppResult<Vec<AttemptHistoryEntry>> {
        let attempts = self.attempts.find_by_user(subject_id, limit).await?;

        let mut lesson_names: HashMap<String, String> = HashMap::new();
        let mut history = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            let lesson_name = match lesson_names.get(&attempt.lesson_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .content
                        .find_lesson(&attempt.lesson_id)
                        .await?
                        .map(|lesson| lesson.name)
                        .unwrap_or_else(|| "Unknown".to_string());
                    lesson_names.insert(attempt.lesson_id.clone(), name.clone());
                    name
                }
            };
            history.push(AttemptHistoryEntry::new(attempt, lesson_name));
        }

        Ok(history)
    }

    /// Stores a scored quiz and applies a level upgrade when it earns one.
    ///
    /// Also the retry path after `AppError::PersistenceFailure`: a result that
    /// already carries an attempt id is not recorded twice.
    pub async fn persist_result(&self, mut result: QuizResult) -> AppResult<QuizResult> {
        if result.attempt_id.is_none() {
            let attempt = Attempt::new(
                &result.user_id,
                &result.lesson_id,
                saturating_i32(result.score_percentage),
                saturating_i32(result.total_questions),
                saturating_i32(result.correct_answers),
                saturating_i32(result.completion_time_minutes),
                result.passed,
            );

            match self.attempts.create(attempt).await {
                Ok(saved) => result.attempt_id = Some(saved.id),
                Err(err) => {
                    log::error!(
                        "Failed to record attempt for user {} on lesson {}: {}",
                        result.user_id,
                        result.lesson_id,
                        err
                    );
                    return Err(AppError::persistence(err.to_string(), result));
                }
            }
        }

        if result.passed && result.new_level.is_none() {
            match self.apply_level_upgrade(&result.user_id).await {
                Ok(upgrade) => result.new_level = upgrade,
                Err(err) => {
                    log::error!("Level upgrade check failed for user {}: {}", result.user_id, err);
                    return Err(AppError::persistence(err.to_string(), result));
                }
            }
        }

        Ok(result)
    }

    async fn apply_answer(
        &self,
        slot: &mut Option<QuizSession>,
        question_id: &str,
        option_id: &str,
    ) -> AppResult<SubmitAnswerResponse> {
        let session = slot
            .as_mut()
            .ok_or_else(|| AppError::InvalidState("No active quiz session".to_string()))?;

        let phase = match session.submit_answer(question_id, option_id) {
            Ok(phase) => phase,
            Err(AppError::AlreadyAnswered(message)) => {
                log::debug!(
                    "Rejected repeated answer for question {} in quiz {}",
                    question_id,
                    session.id()
                );
                return Ok(SubmitAnswerResponse::Rejected {
                    question_id: question_id.to_string(),
                    message,
                });
            }
            Err(err) => return Err(err),
        };

        let is_correct = session
            .question(question_id)
            .is_some_and(|question| question.is_correct_choice(option_id));

        if phase == SessionPhase::InProgress {
            session.advance();
            return Ok(SubmitAnswerResponse::NextQuestion {
                is_correct,
                progress: session.progress(),
                question: session.current_question().map(QuestionView::from),
            });
        }

        let result = ScoringService::score(session, Utc::now())?;
        let session_id = session.id().to_string();

        // Evict before touching the attempt store so the quiz can never be scored twice.
        slot.take();
        log::info!(
            "Completed quiz {} for user {}: {}/{} correct ({}%)",
            session_id,
            result.user_id,
            result.correct_answers,
            result.total_questions,
            result.score_percentage
        );

        let result = self.persist_result(result).await?;
        Ok(SubmitAnswerResponse::Completed { is_correct, result })
    }

    /// Lessons are open up to and including the learner's current level.
    async fn check_access(&self, user: &User, lesson: &Lesson) -> AppResult<()> {
        if lesson.level_id == user.current_level_id {
            return Ok(());
        }

        let user_level = self
            .content
            .find_level(&user.current_level_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Level with id '{}' not found", user.current_level_id))
            })?;
        let lesson_level = self
            .content
            .find_level(&lesson.level_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Level with id '{}' not found", lesson.level_id)))?;

        if lesson_level.order > user_level.order {
            return Err(AppError::AccessDenied(format!(
                "Lesson '{}' requires level '{}'",
                lesson.id, lesson_level.name
            )));
        }

        Ok(())
    }

    async fn load_snapshot(&self, lesson: &Lesson) -> AppResult<Vec<QuestionSnapshot>> {
        let questions = self.content.questions_by_lesson(&lesson.id).await?;

        let mut snapshot = Vec::with_capacity(questions.len());
        for question in questions {
            let options = self.content.options_by_question(&question.id).await?;
            let question = QuestionSnapshot::new(question, options);

            match question.correct_option_count() {
                1 => {}
                0 => log::warn!("Question {} has no correct option", question.id()),
                n => log::warn!(
                    "Question {} has {} correct options, only single choice is graded",
                    question.id(),
                    n
                ),
            }
            snapshot.push(question);
        }

        Ok(snapshot)
    }

    async fn apply_level_upgrade(&self, user_id: &str) -> AppResult<Option<LevelUpgrade>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", user_id)))?;

        let current = self
            .content
            .find_level(&user.current_level_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Level with id '{}' not found", user.current_level_id))
            })?;

        let lessons = self.content.lessons_by_level(&current.id).await?;
        let mut lessons_passed = Vec::with_capacity(lessons.len());
        for lesson in &lessons {
            let passed = self.attempts.has_passing_attempt(user_id, &lesson.id).await?;
            lessons_passed.push(passed);
            if !passed {
                break;
            }
        }

        let levels = self.content.list_levels().await?;
        let Some(next) = ScoringService::upgrade_target(&current, &levels, &lessons_passed) else {
            return Ok(None);
        };

        self.users.update_current_level(user_id, &next.id).await?;
        log::info!(
            "User {} advanced from level {} to {}",
            user_id,
            current.name,
            next.name
        );

        Ok(Some(LevelUpgrade {
            level_id: next.id.clone(),
            level_name: next.name.clone(),
        }))
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
