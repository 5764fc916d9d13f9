//! Revenue reports and dashboards for owners and players.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Timelike, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{
        booking::BookingRepository, court::CourtRepository, message::MessageRepository,
        shared_booking::SharedBookingRepository,
    },
    error::AppError,
    model::{
        analytics::{
            CourtRevenue, FinancialReport, MonthlyRevenue, OwnerAnalytics, OwnerDashboard,
            PlayerDashboard, RevenueBucket,
        },
        booking::{BookingStatus, BookingWithCourt},
        player::Player,
    },
    util::parse::{round1, round2},
};

pub const MAX_ANALYTICS_DAYS: i64 = 365;
pub const DASHBOARD_UPCOMING_LIMIT: u64 = 5;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub struct AnalyticsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Revenue from confirmed bookings dated within a calendar month.
    ///
    /// # Returns
    /// - `Ok(MonthlyRevenue)` - Totals with a per-court breakdown, highest revenue first
    /// - `Err(AppError::BadRequest)` - Month outside 1-12
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn monthly_revenue(
        &self,
        owner_id: i32,
        year: i32,
        month: u32,
    ) -> Result<MonthlyRevenue, AppError> {
        let (first, last) = month_bounds(year, month)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid month {year}-{month}")))?;

        let bookings = BookingRepository::new(self.db)
            .get_for_owner(owner_id, Some(BookingStatus::Confirmed), Some(first), Some(last))
            .await?;

        Ok(MonthlyRevenue {
            year,
            month,
            total_revenue: total_revenue(&bookings),
            booking_count: bookings.len() as u64,
            by_court: revenue_by_court(&bookings),
        })
    }

    /// Booking counts and revenue breakdowns over the last `days` days up to `today`.
    ///
    /// Counts cover every status, revenue only confirmed bookings. Weekday buckets are always
    /// the seven days Monday first; hour buckets only list hours with revenue.
    pub async fn owner_analytics(
        &self,
        owner_id: i32,
        days: i64,
        today: NaiveDate,
    ) -> Result<OwnerAnalytics, AppError> {
        if !(1..=MAX_ANALYTICS_DAYS).contains(&days) {
            return Err(AppError::BadRequest(format!(
                "Days must be between 1 and {MAX_ANALYTICS_DAYS}"
            )));
        }

        let from = today - Duration::days(days - 1);
        let bookings = BookingRepository::new(self.db)
            .get_for_owner(owner_id, None, Some(from), Some(today))
            .await?;
        let confirmed = with_status(&bookings, BookingStatus::Confirmed);

        let mut weekdays: Vec<RevenueBucket> = WEEKDAYS
            .iter()
            .map(|day| RevenueBucket {
                label: day.to_string(),
                revenue: 0.0,
                booking_count: 0,
            })
            .collect();
        let mut hours: BTreeMap<u32, RevenueBucket> = BTreeMap::new();

        for b in &confirmed {
            let day = &mut weekdays[b.booking.booking_date.weekday().num_days_from_monday() as usize];
            day.revenue += b.booking.total_cost;
            day.booking_count += 1;

            let hour = b.booking.start_time.hour();
            let bucket = hours.entry(hour).or_insert_with(|| RevenueBucket {
                label: format!("{hour:02}:00"),
                revenue: 0.0,
                booking_count: 0,
            });
            bucket.revenue += b.booking.total_cost;
            bucket.booking_count += 1;
        }

        let round_bucket = |mut bucket: RevenueBucket| {
            bucket.revenue = round2(bucket.revenue);
            bucket
        };

        Ok(OwnerAnalytics {
            days,
            total_revenue: total_revenue(&confirmed),
            total_bookings: bookings.len() as u64,
            confirmed_bookings: confirmed.len() as u64,
            pending_bookings: count_status(&bookings, BookingStatus::Pending),
            by_court: revenue_by_court(&confirmed),
            by_weekday: weekdays.into_iter().map(round_bucket).collect(),
            by_hour: hours.into_values().map(round_bucket).collect(),
        })
    }

    /// Totals and rates for bookings dated within an inclusive range.
    ///
    /// Approval rate is confirmed over decided (confirmed plus rejected), cancellation rate is
    /// cancelled over all bookings, both as percentages. Average value is per confirmed booking.
    pub async fn financial_report(
        &self,
        owner_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<FinancialReport, AppError> {
        if start_date > end_date {
            return Err(AppError::BadRequest(
                "Start date must not be after end date".to_string(),
            ));
        }

        let bookings = BookingRepository::new(self.db)
            .get_for_owner(owner_id, None, Some(start_date), Some(end_date))
            .await?;

        let total = bookings.len() as u64;
        let confirmed = with_status(&bookings, BookingStatus::Confirmed);
        let confirmed_count = confirmed.len() as u64;
        let rejected = count_status(&bookings, BookingStatus::Rejected);
        let cancelled = count_status(&bookings, BookingStatus::Cancelled);
        let revenue = total_revenue(&confirmed);

        Ok(FinancialReport {
            start_date,
            end_date,
            total_revenue: revenue,
            total_bookings: total,
            confirmed_bookings: confirmed_count,
            pending_bookings: count_status(&bookings, BookingStatus::Pending),
            cancelled_bookings: cancelled,
            rejected_bookings: rejected,
            approval_rate: percentage(confirmed_count, confirmed_count + rejected),
            cancellation_rate: percentage(cancelled, total),
            average_booking_value: if confirmed_count > 0 {
                round2(revenue / confirmed_count as f64)
            } else {
                0.0
            },
        })
    }

    /// Court counts, pending requests, today's schedule and this month's revenue.
    pub async fn owner_dashboard(
        &self,
        owner_id: i32,
        today: NaiveDate,
    ) -> Result<OwnerDashboard, AppError> {
        let booking_repo = BookingRepository::new(self.db);

        let (court_count, active_court_count) =
            CourtRepository::new(self.db).count_by_owner(owner_id).await?;
        let pending_requests = booking_repo.count_pending_for_owner(owner_id).await?;
        let todays_bookings = booking_repo
            .get_for_owner(owner_id, None, Some(today), Some(today))
            .await?
            .into_iter()
            .filter(|b| b.booking.status.blocks_slot())
            .collect();
        let month = self
            .monthly_revenue(owner_id, today.year(), today.month())
            .await?;

        Ok(OwnerDashboard {
            court_count,
            active_court_count,
            pending_requests,
            todays_bookings,
            month_revenue: month.total_revenue,
        })
    }

    /// Upcoming bookings, proposals awaiting a response and unread message count.
    pub async fn player_dashboard(&self, player: &Player) -> Result<PlayerDashboard, AppError> {
        let now = Utc::now();

        let upcoming_bookings = BookingRepository::new(self.db)
            .get_upcoming_for_player(player.id, now.date_naive(), DASHBOARD_UPCOMING_LIMIT)
            .await?;
        let pending_proposals = SharedBookingRepository::new(self.db)
            .get_pending_for_recipient(player.id, now)
            .await?;
        let unread_messages = MessageRepository::new(self.db)
            .count_unread(player.user_id)
            .await?;

        Ok(PlayerDashboard {
            player_id: player.id,
            upcoming_bookings,
            pending_proposals,
            unread_messages,
        })
    }
}

/// First and last day of a month, `None` for an invalid month.
fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next - Duration::days(1)))
}

fn with_status(bookings: &[BookingWithCourt], status: BookingStatus) -> Vec<BookingWithCourt> {
    bookings
        .iter()
        .filter(|b| b.booking.status == status)
        .cloned()
        .collect()
}

fn count_status(bookings: &[BookingWithCourt], status: BookingStatus) -> u64 {
    bookings.iter().filter(|b| b.booking.status == status).count() as u64
}

fn total_revenue(bookings: &[BookingWithCourt]) -> f64 {
    round2(bookings.iter().map(|b| b.booking.total_cost).sum())
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

/// Sums revenue per court, highest revenue first and ties by name.
fn revenue_by_court(bookings: &[BookingWithCourt]) -> Vec<CourtRevenue> {
    let mut by_court: BTreeMap<i32, CourtRevenue> = BTreeMap::new();
    for b in bookings {
        let entry = by_court
            .entry(b.booking.court_id)
            .or_insert_with(|| CourtRevenue {
                court_id: b.booking.court_id,
                court_name: b.court_name.clone(),
                revenue: 0.0,
                booking_count: 0,
            });
        entry.revenue += b.booking.total_cost;
        entry.booking_count += 1;
    }

    let mut courts: Vec<CourtRevenue> = by_court
        .into_values()
        .map(|mut c| {
            c.revenue = round2(c.revenue);
            c
        })
        .collect();
    courts.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.court_name.cmp(&b.court_name))
    });
    courts
}
