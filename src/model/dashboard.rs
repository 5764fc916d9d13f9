use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{booking::BookingDto, shared_booking::SharedBookingDto};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CourtRevenueDto {
    pub court_id: i32,
    pub court_name: String,
    pub revenue: f64,
    pub booking_count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct MonthlyRevenueDto {
    pub year: i32,
    pub month: u32,
    pub total_revenue: f64,
    pub booking_count: u64,
    pub by_court: Vec<CourtRevenueDto>,
}

/// Revenue and booking count for one weekday or hour bucket.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct RevenueBucketDto {
    pub label: String,
    pub revenue: f64,
    pub booking_count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct OwnerAnalyticsDto {
    pub days: i64,
    pub total_revenue: f64,
    pub total_bookings: u64,
    pub confirmed_bookings: u64,
    pub pending_bookings: u64,
    pub by_court: Vec<CourtRevenueDto>,
    pub by_weekday: Vec<RevenueBucketDto>,
    pub by_hour: Vec<RevenueBucketDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct FinancialReportDto {
    pub start_date: String,
    pub end_date: String,
    pub total_revenue: f64,
    pub total_bookings: u64,
    pub confirmed_bookings: u64,
    pub pending_bookings: u64,
    pub cancelled_bookings: u64,
    pub rejected_bookings: u64,
    /// Confirmed out of decided (confirmed + rejected), percent
    pub approval_rate: f64,
    /// Cancelled out of all bookings, percent
    pub cancellation_rate: f64,
    pub average_booking_value: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct OwnerDashboardDto {
    pub court_count: u64,
    pub active_court_count: u64,
    pub pending_requests: u64,
    pub todays_bookings: Vec<BookingDto>,
    pub month_revenue: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PlayerDashboardDto {
    pub upcoming_bookings: Vec<BookingDto>,
    pub pending_proposals: Vec<SharedBookingDto>,
    pub unread_messages: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct PlatformStatsDto {
    pub total_users: u64,
    pub active_users: u64,
    pub players: u64,
    pub owners: u64,
    pub admins: u64,
    pub total_courts: u64,
    pub active_courts: u64,
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub confirmed_bookings: u64,
    pub total_revenue: f64,
    pub shared_proposals: u64,
    pub shared_confirmed: u64,
    /// Confirmed proposals out of all proposals, percent
    pub shared_success_rate: f64,
}
