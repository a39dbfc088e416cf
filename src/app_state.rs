use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoAttemptRepository, MongoContentRepository, MongoUserRepository},
    services::{QuizService, SessionRegistry},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub jwt_service: JwtService,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let content_repository = Arc::new(MongoContentRepository::new(&db));
        content_repository.ensure_indexes().await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let quiz_service = QuizService::new(
            content_repository,
            user_repository,
            attempt_repository,
            Arc::new(SessionRegistry::new()),
        );
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        Ok(Self::from_parts(quiz_service, jwt_service, config))
    }

    pub fn from_parts(quiz_service: QuizService, jwt_service: JwtService, config: Config) -> Self {
        Self {
            quiz_service: Arc::new(quiz_service),
            jwt_service,
            config: Arc::new(config),
        }
    }
}
