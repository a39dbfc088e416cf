#[cfg(test)]
pub mod fixtures {
    use std::{collections::HashMap, sync::Arc};

    use chrono::Utc;

    use crate::app_state::AppState;
    use crate::auth::JwtService;
    use crate::config::Config;
    use crate::models::domain::{
        Difficulty, Lesson, Level, Question, QuestionOption, QuestionSnapshot, QuizSession,
        SkillType, User,
    };
    use crate::repositories::{MockAttemptRepository, MockContentRepository, MockUserRepository};
    use crate::services::{QuizService, SessionRegistry};

    /// Beginner, Intermediate and Advanced, in that order.
    pub fn sample_levels() -> Vec<Level> {
        vec![
            Level::new("beginner", "Beginner", 1),
            Level::new("intermediate", "Intermediate", 2),
            Level::new("advanced", "Advanced", 3),
        ]
    }

    pub fn sample_user(id: &str, level_id: &str) -> User {
        User::new(id, id, &format!("{}@example.com", id), level_id)
    }

    pub fn sample_lesson(id: &str, level_id: &str) -> Lesson {
        Lesson::new(id, &format!("Lesson {}", id), level_id, 1)
    }

    /// Questions `<lesson>-q1..qN`, cycling through skill types and difficulties.
    pub fn lesson_questions(lesson_id: &str, count: usize) -> Vec<Question> {
        const SKILLS: [SkillType; 3] = [
            SkillType::Vocabulary,
            SkillType::Grammar,
            SkillType::FillInBlank,
        ];
        const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
        (1..=count)
            .map(|n| {
                Question::new(
                    &format!("{}-q{}", lesson_id, n),
                    lesson_id,
                    &format!("Question {} of {}", n, lesson_id),
                    SKILLS[(n - 1) % SKILLS.len()],
                    n as i32,
                )
                .with_difficulty(DIFFICULTIES[(n - 1) % DIFFICULTIES.len()])
            })
            .collect()
    }

    /// Options `<question>-a` (correct), `-b` and `-c`, returned out of display order.
    pub fn question_options(question_id: &str) -> Vec<QuestionOption> {
        vec![
            QuestionOption::new(&format!("{}-c", question_id), question_id, "third", false, 3),
            QuestionOption::new(&format!("{}-a", question_id), question_id, "first", true, 1),
            QuestionOption::new(&format!("{}-b", question_id), question_id, "second", false, 2),
        ]
    }

    pub fn lesson_snapshot(lesson_id: &str, count: usize) -> Vec<QuestionSnapshot> {
        lesson_questions(lesson_id, count)
            .into_iter()
            .map(|question| {
                let options = question_options(&question.id);
                QuestionSnapshot::new(question, options)
            })
            .collect()
    }

    pub fn sample_session(subject_id: &str, lesson_id: &str, count: usize) -> QuizSession {
        let lesson = sample_lesson(lesson_id, "beginner");
        QuizSession::new(subject_id, &lesson, lesson_snapshot(lesson_id, count), Utc::now())
            .expect("fixture session should be valid")
    }

    /// Content mock serving `lessons` (each with its question count) and the sample levels.
    pub fn content_mock(lessons: Vec<(Lesson, usize)>) -> MockContentRepository {
        let mut mock = MockContentRepository::new();

        let by_id: HashMap<String, (Lesson, usize)> = lessons
            .into_iter()
            .map(|(lesson, count)| (lesson.id.clone(), (lesson, count)))
            .collect();

        let lookup = by_id.clone();
        mock.expect_find_lesson()
            .returning(move |id| Ok(lookup.get(id).map(|(lesson, _)| lesson.clone())));

        let lookup = by_id.clone();
        mock.expect_lessons_by_level().returning(move |level_id| {
            let mut lessons: Vec<Lesson> = lookup
                .values()
                .map(|(lesson, _)| lesson)
                .filter(|lesson| lesson.level_id == level_id)
                .cloned()
                .collect();
            lessons.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(lessons)
        });

        let lookup = by_id;
        mock.expect_questions_by_lesson().returning(move |lesson_id| {
            Ok(lookup
                .get(lesson_id)
                .map(|(_, count)| lesson_questions(lesson_id, *count))
                .unwrap_or_default())
        });

        mock.expect_options_by_question()
            .returning(|question_id| Ok(question_options(question_id)));

        mock.expect_find_level()
            .returning(|id| Ok(sample_levels().into_iter().find(|level| level.id == id)));

        mock.expect_list_levels().returning(|| Ok(sample_levels()));

        mock
    }

    /// User mock that only answers lookups. Level updates must be expected by the test.
    pub fn users_mock(users: Vec<User>) -> MockUserRepository {
        let mut mock = MockUserRepository::new();
        mock.expect_find_by_id()
            .returning(move |id| Ok(users.iter().find(|user| user.id == id).cloned()));
        mock
    }

    /// Application state over the given mocks and `Config::test_config()`.
    pub fn state_with(
        content: MockContentRepository,
        users: MockUserRepository,
        attempts: MockAttemptRepository,
    ) -> AppState {
        let config = Config::test_config();
        let quiz_service = QuizService::new(
            Arc::new(content),
            Arc::new(users),
            Arc::new(attempts),
            Arc::new(SessionRegistry::new()),
        );
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        AppState::from_parts(quiz_service, jwt_service, config)
    }

    pub fn test_state() -> AppState {
        state_with(
            MockContentRepository::new(),
            MockUserRepository::new(),
            MockAttemptRepository::new(),
        )
    }

    /// `Bearer <jwt>` for `user_id`, signed with the state's key.
    pub fn bearer_token(state: &AppState, user_id: &str) -> String {
        let token = state
            .jwt_service
            .create_token(&sample_user(user_id, "beginner"))
            .expect("token should be signed");
        format!("Bearer {}", token)
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_questions_have_one_correct_option() {
        let snapshot = lesson_snapshot("lesson-1", 3);
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.iter().all(|q| q.correct_option_count() == 1));
        assert_eq!(snapshot[2].id(), "lesson-1-q3");
    }

    #[test]
    fn test_fixture_levels_are_ordered() {
        let levels = sample_levels();
        assert!(levels.windows(2).all(|pair| pair[0].order < pair[1].order));
    }
}
