pub mod quiz_service;
pub mod scoring_service;
pub mod session_registry;

pub use quiz_service::QuizService;
pub use scoring_service::{ScoringService, PASS_THRESHOLD_PERCENT};
pub use session_registry::{SessionGuard, SessionRegistry};
