//! API data transfer objects.
//!
//! Request and response bodies exchanged over the JSON API. Dates travel as
//! `YYYY-MM-DD` strings and times of day as `HH:MM` strings; timestamps are RFC 3339.

pub mod api;
pub mod booking;
pub mod chat;
pub mod court;
pub mod dashboard;
pub mod matching;
pub mod shared_booking;
pub mod user;
