//! Revenue and dashboard aggregates.

use chrono::NaiveDate;

use crate::{
    model::dashboard::{
        CourtRevenueDto, FinancialReportDto, MonthlyRevenueDto, OwnerAnalyticsDto,
        OwnerDashboardDto, PlatformStatsDto, PlayerDashboardDto, RevenueBucketDto,
    },
    server::{
        model::{booking::BookingWithCourt, shared_booking::SharedBooking},
        util::parse::format_date,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct CourtRevenue {
    pub court_id: i32,
    pub court_name: String,
    pub revenue: f64,
    pub booking_count: u64,
}

impl CourtRevenue {
    pub fn into_dto(self) -> CourtRevenueDto {
        CourtRevenueDto {
            court_id: self.court_id,
            court_name: self.court_name,
            revenue: self.revenue,
            booking_count: self.booking_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub total_revenue: f64,
    pub booking_count: u64,
    pub by_court: Vec<CourtRevenue>,
}

impl MonthlyRevenue {
    pub fn into_dto(self) -> MonthlyRevenueDto {
        MonthlyRevenueDto {
            year: self.year,
            month: self.month,
            total_revenue: self.total_revenue,
            booking_count: self.booking_count,
            by_court: self.by_court.into_iter().map(CourtRevenue::into_dto).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueBucket {
    pub label: String,
    pub revenue: f64,
    pub booking_count: u64,
}

impl RevenueBucket {
    pub fn into_dto(self) -> RevenueBucketDto {
        RevenueBucketDto {
            label: self.label,
            revenue: self.revenue,
            booking_count: self.booking_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnerAnalytics {
    pub days: i64,
    pub total_revenue: f64,
    pub total_bookings: u64,
    pub confirmed_bookings: u64,
    pub pending_bookings: u64,
    pub by_court: Vec<CourtRevenue>,
    pub by_weekday: Vec<RevenueBucket>,
    pub by_hour: Vec<RevenueBucket>,
}

impl OwnerAnalytics {
    pub fn into_dto(self) -> OwnerAnalyticsDto {
        OwnerAnalyticsDto {
            days: self.days,
            total_revenue: self.total_revenue,
            total_bookings: self.total_bookings,
            confirmed_bookings: self.confirmed_bookings,
            pending_bookings: self.pending_bookings,
            by_court: self.by_court.into_iter().map(CourtRevenue::into_dto).collect(),
            by_weekday: self
                .by_weekday
                .into_iter()
                .map(RevenueBucket::into_dto)
                .collect(),
            by_hour: self.by_hour.into_iter().map(RevenueBucket::into_dto).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_revenue: f64,
    pub total_bookings: u64,
    pub confirmed_bookings: u64,
    pub pending_bookings: u64,
    pub cancelled_bookings: u64,
    pub rejected_bookings: u64,
    pub approval_rate: f64,
    pub cancellation_rate: f64,
    pub average_booking_value: f64,
}

impl FinancialReport {
    pub fn into_dto(self) -> FinancialReportDto {
        FinancialReportDto {
            start_date: format_date(self.start_date),
            end_date: format_date(self.end_date),
            total_revenue: self.total_revenue,
            total_bookings: self.total_bookings,
            confirmed_bookings: self.confirmed_bookings,
            pending_bookings: self.pending_bookings,
            cancelled_bookings: self.cancelled_bookings,
            rejected_bookings: self.rejected_bookings,
            approval_rate: self.approval_rate,
            cancellation_rate: self.cancellation_rate,
            average_booking_value: self.average_booking_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnerDashboard {
    pub court_count: u64,
    pub active_court_count: u64,
    pub pending_requests: u64,
    pub todays_bookings: Vec<BookingWithCourt>,
    pub month_revenue: f64,
}

impl OwnerDashboard {
    pub fn into_dto(self) -> OwnerDashboardDto {
        OwnerDashboardDto {
            court_count: self.court_count,
            active_court_count: self.active_court_count,
            pending_requests: self.pending_requests,
            todays_bookings: self
                .todays_bookings
                .into_iter()
                .map(BookingWithCourt::into_dto)
                .collect(),
            month_revenue: self.month_revenue,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDashboard {
    pub player_id: i32,
    pub upcoming_bookings: Vec<BookingWithCourt>,
    pub pending_proposals: Vec<SharedBooking>,
    pub unread_messages: u64,
}

impl PlayerDashboard {
    pub fn into_dto(self) -> PlayerDashboardDto {
        let player_id = self.player_id;
        PlayerDashboardDto {
            upcoming_bookings: self
                .upcoming_bookings
                .into_iter()
                .map(BookingWithCourt::into_dto)
                .collect(),
            pending_proposals: self
                .pending_proposals
                .into_iter()
                .map(|p| p.into_dto(Some(player_id)))
                .collect(),
            unread_messages: self.unread_messages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlatformStats {
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
    pub shared_success_rate: f64,
}

impl PlatformStats {
    pub fn into_dto(self) -> PlatformStatsDto {
        PlatformStatsDto {
            total_users: self.total_users,
            active_users: self.active_users,
            players: self.players,
            owners: self.owners,
            admins: self.admins,
            total_courts: self.total_courts,
            active_courts: self.active_courts,
            total_bookings: self.total_bookings,
            pending_bookings: self.pending_bookings,
            confirmed_bookings: self.confirmed_bookings,
            total_revenue: self.total_revenue,
            shared_proposals: self.shared_proposals,
            shared_confirmed: self.shared_confirmed,
            shared_success_rate: self.shared_success_rate,
        }
    }
}
