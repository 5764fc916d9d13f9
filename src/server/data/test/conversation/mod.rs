use crate::server::{
    data::conversation::ConversationRepository, model::chat::ConversationType,
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod find_between;
mod get_for_user;
