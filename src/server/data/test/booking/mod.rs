use crate::server::{
    data::booking::{BookingInsert, BookingRepository},
    model::booking::{BookingStatus, CreateBookingParam},
};
use sea_orm::DbErr;
use test_utils::{
    builder::TestBuilder,
    factory::{
        self,
        helpers::{days_from_today, hour},
    },
};

mod count_by_players;
mod create_checked;
mod find_conflict;
mod get_for_owner;
mod get_for_player;
mod update_status;

fn booking_param(court_id: i32, player_id: i32, start: u32, end: u32) -> CreateBookingParam {
    CreateBookingParam {
        court_id,
        player_id,
        partner_player_id: None,
        booking_date: days_from_today(1),
        start_time: hour(start),
        end_time: hour(end),
        notes: None,
        total_cost: 50.0 * (end - start) as f64,
    }
}
