use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Lesson, Level, Question, QuestionOption},
};

/// Read-only access to the lesson catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_lesson(&self, lesson_id: &str) -> AppResult<Option<Lesson>>;
    async fn lessons_by_level(&self, level_id: &str) -> AppResult<Vec<Lesson>>;
    /// Questions of a lesson in presentation order.
    async fn questions_by_lesson(&self, lesson_id: &str) -> AppResult<Vec<Question>>;
    /// Options of a question in display order.
    async fn options_by_question(&self, question_id: &str) -> AppResult<Vec<QuestionOption>>;
    async fn find_level(&self, level_id: &str) -> AppResult<Option<Level>>;
    /// All levels, lowest `order` first.
    async fn list_levels(&self) -> AppResult<Vec<Level>>;
}

pub struct MongoContentRepository {
    levels: Collection<Level>,
    lessons: Collection<Lesson>,
    questions: Collection<Question>,
    options: Collection<QuestionOption>,
}

impl MongoContentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            levels: db.get_collection("levels"),
            lessons: db.get_collection("lessons"),
            questions: db.get_collection("questions"),
            options: db.get_collection("options"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for content collections");

        let unique_id = || {
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("id_unique".to_string())
                        .build(),
                )
                .build()
        };

        self.levels.create_index(unique_id()).await?;
        self.lessons.create_index(unique_id()).await?;
        self.questions.create_index(unique_id()).await?;
        self.options.create_index(unique_id()).await?;

        let lesson_level_index = IndexModel::builder()
            .keys(doc! { "level_id": 1, "order": 1 })
            .options(IndexOptions::builder().name("level_order".to_string()).build())
            .build();
        self.lessons.create_index(lesson_level_index).await?;

        let question_lesson_index = IndexModel::builder()
            .keys(doc! { "lesson_id": 1, "order": 1 })
            .options(IndexOptions::builder().name("lesson_order".to_string()).build())
            .build();
        self.questions.create_index(question_lesson_index).await?;

        let option_question_index = IndexModel::builder()
            .keys(doc! { "question_id": 1, "display_order": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("question_display_order".to_string())
                    .build(),
            )
            .build();
        self.options.create_index(option_question_index).await?;

        log::info!("Successfully created indexes for content collections");
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn find_lesson(&self, lesson_id: &str) -> AppResult<Option<Lesson>> {
        let lesson = self.lessons.find_one(doc! { "id": lesson_id }).await?;
        Ok(lesson)
    }

    async fn lessons_by_level(&self, level_id: &str) -> AppResult<Vec<Lesson>> {
        let lessons = self
            .lessons
            .find(doc! { "level_id": level_id })
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(lessons)
    }

    async fn questions_by_lesson(&self, lesson_id: &str) -> AppResult<Vec<Question>> {
        let questions = self
            .questions
            .find(doc! { "lesson_id": lesson_id })
            .sort(doc! { "order": 1, "id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn options_by_question(&self, question_id: &str) -> AppResult<Vec<QuestionOption>> {
        let options = self
            .options
            .find(doc! { "question_id": question_id })
            .sort(doc! { "display_order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(options)
    }

    async fn find_level(&self, level_id: &str) -> AppResult<Option<Level>> {
        let level = self.levels.find_one(doc! { "id": level_id }).await?;
        Ok(level)
    }

    async fn list_levels(&self) -> AppResult<Vec<Level>> {
        let levels = self
            .levels
            .find(doc! {})
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(levels)
    }
}
