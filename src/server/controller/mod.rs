pub mod admin;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod court;
pub mod matching;
pub mod owner;
pub mod param;
pub mod player;
pub mod shared_booking;
pub mod user;
