use crate::server::{
    data::court::CourtRepository,
    model::court::{CourtFilter, CourtType, Surface, UpdateCourtParam},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod name_exists_for_owner;
mod search;
mod update;
