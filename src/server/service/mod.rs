//! Service layer for business logic and orchestration.
//!
//! Services sit between the controller (API) layer and the data (repository) layer. They
//! apply the booking and account rules, coordinate several repositories for one operation,
//! and call the external geocoding and email providers. Services take and return domain
//! models rather than DTOs or entity models.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod court;
pub mod email;
pub mod geo;
pub mod matching;
pub mod notification;
pub mod pricing;
pub mod rule;
pub mod shared_booking;
pub mod user;
