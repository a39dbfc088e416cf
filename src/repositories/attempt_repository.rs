use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Attempt};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt>;
    async fn has_passing_attempt(&self, user_id: &str, lesson_id: &str) -> AppResult<bool>;
    /// Most recent first.
    async fn find_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<Attempt>>;
}

pub struct MongoAttemptRepository {
    collection: Collection<Attempt>,
}

impl MongoAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("student_attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for student_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_lesson_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "lesson_id": 1, "passed": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_lesson_passed".to_string())
                    .build(),
            )
            .build();

        let user_date_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_lesson_index).await?;
        self.collection.create_index(user_date_index).await?;

        log::info!("Successfully created indexes for student_attempts collection");
        Ok(())
    }
}

#[async_trait]
impl AttemptRepository for MongoAttemptRepository {
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn has_passing_attempt(&self, user_id: &str, lesson_id: &str) -> AppResult<bool> {
        let attempt = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "lesson_id": lesson_id,
                "passed": true
            })
            .await?;
        Ok(attempt.is_some())
    }

    async fn find_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<Attempt>> {
        let attempts = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }
}
