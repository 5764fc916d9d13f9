//! Shared helper utilities for factory methods.
//!
//! This module provides common utilities used across all factory modules,
//! including ID generation and default booking dates.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};

/// Counter for generating unique IDs in tests.
///
/// This atomic counter ensures each factory-created entity gets a unique
/// identifier to prevent collisions in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// This function provides monotonically increasing values for use in
/// generating unique test identifiers across all factories.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Date `days` from today in UTC.
pub fn days_from_today(days: i64) -> NaiveDate {
    (Utc::now() + Duration::days(days)).date_naive()
}

/// Builds a whole-hour time of day.
///
/// # Panics
/// Panics when `hour` is not within 0-23.
pub fn hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).expect("hour must be within 0-23")
}
