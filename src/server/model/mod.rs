//! Domain models and operation parameters.
//!
//! Domain models are converted from SeaORM entities at the repository boundary
//! (`from_entity`) and into API DTOs at the controller boundary (`into_dto`). Enum-like
//! columns are stored as strings and parsed into typed enums here.

pub mod analytics;
pub mod booking;
pub mod chat;
pub mod court;
pub mod matching;
pub mod player;
pub mod shared_booking;
pub mod user;
