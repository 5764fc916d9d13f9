use crate::server::{
    data::shared_booking::SharedBookingRepository,
    model::shared_booking::{AlternativeSlot, SharedBookingStatus},
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{
    builder::TestBuilder,
    factory::{
        self,
        helpers::{days_from_today, hour},
    },
};

mod expire_overdue;
mod get_pending_for_recipient;
mod pending_exists_between;
mod record_response;
