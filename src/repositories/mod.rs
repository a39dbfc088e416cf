pub mod attempt_repository;
pub mod content_repository;
pub mod user_repository;

pub use attempt_repository::{AttemptRepository, MongoAttemptRepository};
pub use content_repository::{ContentRepository, MongoContentRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

#[cfg(test)]
pub use attempt_repository::MockAttemptRepository;
#[cfg(test)]
pub use content_repository::MockContentRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
