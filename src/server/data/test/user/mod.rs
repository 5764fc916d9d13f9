use crate::server::{
    data::user::UserRepository,
    model::{
        player::SkillLevel,
        user::{CreateUserParam, NewProfile, Role, UserFilter},
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod find_credentials;
mod get_all_paginated;
mod get_messaging_directory;
mod set_active;

fn user_param(username: &str, email: &str, role: Role) -> CreateUserParam {
    CreateUserParam {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role,
        full_name: None,
        phone: None,
        city: None,
    }
}
