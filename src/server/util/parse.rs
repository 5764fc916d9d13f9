use chrono::{NaiveDate, NaiveTime};
use std::str::FromStr;

use crate::server::error::{internal::InternalError, rule::RuleViolation, AppError};

/// Date format accepted and produced by the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Time-of-day format accepted and produced by the API.
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a `YYYY-MM-DD` date.
///
/// # Arguments
/// - `value` - The string to parse
///
/// # Returns
/// - `Ok(NaiveDate)` - Successfully parsed date
/// - `Err(RuleViolation::InvalidDateTimeFormat)` - Value is not a valid date
pub fn parse_date(value: &str) -> Result<NaiveDate, RuleViolation> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| RuleViolation::InvalidDateTimeFormat)
}

/// Parses a `HH:MM` time of day.
///
/// # Returns
/// - `Ok(NaiveTime)` - Successfully parsed time
/// - `Err(RuleViolation::InvalidDateTimeFormat)` - Value is not a valid time
pub fn parse_time(value: &str) -> Result<NaiveTime, RuleViolation> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| RuleViolation::InvalidDateTimeFormat)
}

/// Parses a booking date and its start/end times together.
pub fn parse_slot(
    date: &str,
    start: &str,
    end: &str,
) -> Result<(NaiveDate, NaiveTime, NaiveTime), RuleViolation> {
    Ok((parse_date(date)?, parse_time(start)?, parse_time(end)?))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Parses a request value into one of the string-backed domain enums.
///
/// # Returns
/// - `Ok(T)` - Parsed value
/// - `Err(AppError::BadRequest)` - Value is not a known variant
pub fn parse_field<T>(value: &str) -> Result<T, AppError>
where
    T: FromStr<Err = InternalError>,
{
    T::from_str(value.trim().to_lowercase().as_str()).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Parses an optional request value, see `parse_field`.
pub fn parse_optional_field<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = InternalError>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse_field)
        .transpose()
}

/// Parses an optional `HH:MM` value, mapping failures to a 400.
pub fn parse_optional_time(value: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    value
        .map(|v| parse_time(v).map_err(AppError::from))
        .transpose()
}

pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_date(v).map_err(AppError::from))
        .transpose()
}

/// Rounds to one decimal place, as used for scores and percentages.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to two decimal places, as used for money and distances.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
