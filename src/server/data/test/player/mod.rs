use crate::server::{
    data::player::PlayerRepository,
    model::player::{Availability, SkillLevel, UpdatePlayerParam},
    util::geo::Coordinates,
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod get_active_candidates;
mod update;
