use crate::server::{
    data::message::MessageRepository,
    model::chat::{CreateMessageParam, MessageType},
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod count_unread;
mod create;
mod get_page;
mod get_since;
mod mark_conversation_read;
