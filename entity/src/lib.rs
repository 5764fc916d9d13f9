//! SeaORM entities for the court booking database.

pub mod prelude;

pub mod booking;
pub mod conversation;
pub mod conversation_participant;
pub mod court;
pub mod message;
pub mod message_read_status;
pub mod owner;
pub mod player;
pub mod shared_booking;
pub mod user;
