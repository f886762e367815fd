//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` entity structs matching database rows
//! - `Deserialize` create DTOs for inserts

pub mod attempt;
pub mod question;
pub mod quiz;
