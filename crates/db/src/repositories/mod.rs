//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod question_repo;
pub mod quiz_attempt_repo;
pub mod quiz_repo;

pub use question_repo::QuestionRepo;
pub use quiz_attempt_repo::QuizAttemptRepo;
pub use quiz_repo::QuizRepo;
