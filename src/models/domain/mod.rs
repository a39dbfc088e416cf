pub mod attempt;
pub mod lesson;
pub mod level;
pub mod question;
pub mod quiz_session;
pub mod user;
pub use attempt::Attempt;
pub use lesson::Lesson;
pub use level::Level;
pub use question::{Difficulty, Question, QuestionOption, SkillType};
pub use quiz_session::{QuestionSnapshot, QuizSession, SessionPhase};
pub use user::User;
