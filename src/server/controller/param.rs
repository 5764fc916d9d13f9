//! Query string parameters shared by the API handlers.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::server::{
    error::AppError,
    model::{
        court::CourtFilter,
        matching::{CourtRecommendationFilters, CourtSort, MatchFilters},
        user::{Role, UserFilter},
    },
    util::parse::{parse_optional_date, parse_optional_field},
};

/// Optional inclusive `YYYY-MM-DD` date bounds.
#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeParam {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Owner booking list filter.
#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListParam {
    /// `pending`, `confirmed`, `cancelled` or `rejected`
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Required calendar window.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarParam {
    pub start: String,
    pub end: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityParam {
    pub date: String,
    /// Whole hours, 1-4 (default 1)
    pub duration: Option<u32>,
}

/// A requested slot to find alternatives for.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotParam {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourtSearchParam {
    pub location: Option<String>,
    pub max_price: Option<f64>,
    pub court_type: Option<String>,
    pub surface: Option<String>,
}

impl TryFrom<CourtSearchParam> for CourtFilter {
    type Error = AppError;

    fn try_from(param: CourtSearchParam) -> Result<Self, Self::Error> {
        Ok(Self {
            location: param.location.filter(|l| !l.trim().is_empty()),
            max_price: param.max_price,
            court_type: parse_optional_field(param.court_type.as_deref())?,
            surface: parse_optional_field(param.surface.as_deref())?,
        })
    }
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatchParam {
    pub skill_level: Option<String>,
    pub availability: Option<String>,
    /// Kilometres
    pub max_distance: Option<f64>,
    pub limit: Option<usize>,
}

impl TryFrom<MatchParam> for MatchFilters {
    type Error = AppError;

    fn try_from(param: MatchParam) -> Result<Self, Self::Error> {
        Ok(Self {
            skill_level: parse_optional_field(param.skill_level.as_deref())?,
            availability: parse_optional_field(param.availability.as_deref())?,
            max_distance: param.max_distance,
            limit: param.limit.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourtRecommendationParam {
    pub location: Option<String>,
    pub max_price: Option<f64>,
    pub court_type: Option<String>,
    pub surface: Option<String>,
    /// Date to count free slots on
    pub date: Option<String>,
    pub max_distance: Option<f64>,
    /// `recommended`, `price_low`, `price_high` or `distance`
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

impl TryFrom<CourtRecommendationParam> for CourtRecommendationFilters {
    type Error = AppError;

    fn try_from(param: CourtRecommendationParam) -> Result<Self, Self::Error> {
        Ok(Self {
            location: param.location.filter(|l| !l.trim().is_empty()),
            max_price: param.max_price,
            court_type: parse_optional_field(param.court_type.as_deref())?,
            surface: parse_optional_field(param.surface.as_deref())?,
            date: parse_optional_date(param.date.as_deref())?,
            max_distance: param.max_distance,
            sort: CourtSort::parse(param.sort.as_deref()),
            limit: param.limit.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitParam {
    pub limit: Option<usize>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourtSuggestionParam {
    pub partner_player_id: i32,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SharedBookingListParam {
    pub include_expired: Option<bool>,
}

/// Polling or paging through a conversation.
#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessagesParam {
    /// Only messages with a higher ID, oldest first
    pub since_id: Option<i32>,
    /// Page of older messages, 0 is the newest
    pub page: Option<u64>,
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListParam {
    pub role: Option<String>,
    pub active: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl TryFrom<&UserListParam> for UserFilter {
    type Error = AppError;

    fn try_from(param: &UserListParam) -> Result<Self, Self::Error> {
        Ok(Self {
            role: parse_optional_field(param.role.as_deref())?,
            is_active: param.active,
            search: param.search.clone().filter(|s| !s.trim().is_empty()),
        })
    }
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactParam {
    /// Matches username or full name
    pub search: Option<String>,
    pub role: Option<String>,
}

impl ContactParam {
    pub fn role(&self) -> Result<Option<Role>, AppError> {
        parse_optional_field(self.role.as_deref())
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsParam {
    /// Look-back window in days (default 90)
    pub days: Option<i64>,
}

#[derive(Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthParam {
    /// Defaults to the current year
    pub year: Option<i32>,
    /// Defaults to the current month
    pub month: Option<u32>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportParam {
    pub start: String,
    pub end: String,
}
