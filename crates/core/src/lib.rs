//! Answer evaluation and ephemeral question generation for the quiz backend.
//!
//! Everything in this crate is synchronous and free of I/O apart from the
//! one-time metadata bank load, so it can be shared by the HTTP layer and
//! tests without a runtime.

pub mod difficulty;
pub mod distractors;
pub mod error;
pub mod evaluation;
pub mod metadata_bank;
pub mod scoring;
pub mod session_store;
pub mod song_quiz;
pub mod types;
