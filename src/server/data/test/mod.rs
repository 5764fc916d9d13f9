mod booking;
mod conversation;
mod court;
mod message;
mod player;
mod shared_booking;
mod user;
