//! Slot generation and dynamic pricing.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};

use crate::server::{
    model::{
        booking::Booking,
        court::{SlotAlternative, TimeSlot},
    },
    util::parse::round2,
};

const WEEKEND_MULTIPLIER: f64 = 1.2;
const PEAK_MULTIPLIER: f64 = 1.15;
const HOLIDAY_MULTIPLIER: f64 = 1.3;
/// Demand multiplier applied once the day is at least `HIGH_DEMAND_OCCUPANCY` booked.
const HIGH_DEMAND_MULTIPLIER: f64 = 1.1;
const HIGH_DEMAND_OCCUPANCY: f64 = 0.75;

/// Hour offsets from a taken start tried as alternatives.
const ALTERNATIVE_OFFSETS: [i64; 5] = [-2, -1, 1, 2, 3];
const MAX_ALTERNATIVES: usize = 3;

/// Optional surcharges on top of the weekday and peak-hour rules.
#[derive(Debug, Clone, Copy)]
pub struct PricingFactors {
    pub is_holiday: bool,
    pub demand_factor: f64,
}

impl Default for PricingFactors {
    fn default() -> Self {
        Self {
            is_holiday: false,
            demand_factor: 1.0,
        }
    }
}

fn peak_start() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn peak_end() -> NaiveTime {
    NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn is_peak(start_time: NaiveTime) -> bool {
    start_time >= peak_start() && start_time <= peak_end()
}

/// Hourly rate for a slot after surcharges, rounded to cents.
///
/// Weekend days cost 20% more, a start between 18:00 and 21:00 inclusive 15% more,
/// holidays 30% more, and the demand factor multiplies the result.
pub fn dynamic_rate(
    base_rate: f64,
    date: NaiveDate,
    start_time: NaiveTime,
    factors: PricingFactors,
) -> f64 {
    let mut rate = base_rate;

    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        rate *= WEEKEND_MULTIPLIER;
    }
    if is_peak(start_time) {
        rate *= PEAK_MULTIPLIER;
    }
    if factors.is_holiday {
        rate *= HOLIDAY_MULTIPLIER;
    }
    rate *= factors.demand_factor;

    round2(rate)
}

/// Demand factor for a day from how much of the court's opening hours is already booked.
pub fn demand_factor(opening: NaiveTime, closing: NaiveTime, booked: &[Booking]) -> f64 {
    let open_minutes = (closing - opening).num_minutes();
    if open_minutes <= 0 {
        return 1.0;
    }

    let booked_minutes: i64 = booked
        .iter()
        .map(|b| (b.end_time - b.start_time).num_minutes().max(0))
        .sum();

    if booked_minutes as f64 / open_minutes as f64 >= HIGH_DEMAND_OCCUPANCY {
        HIGH_DEMAND_MULTIPLIER
    } else {
        1.0
    }
}

/// Free slots of `duration_hours` starting on each full hour from opening.
///
/// A slot is offered while `start + duration <= closing` and it does not overlap any of
/// the `booked` slots. Each slot carries its dynamic hourly rate and total cost.
pub fn available_slots(
    date: NaiveDate,
    opening: NaiveTime,
    closing: NaiveTime,
    base_rate: f64,
    duration_hours: u32,
    booked: &[Booking],
) -> Vec<TimeSlot> {
    let duration = Duration::hours(duration_hours.max(1) as i64);
    let factors = PricingFactors {
        demand_factor: demand_factor(opening, closing, booked),
        ..Default::default()
    };

    let mut slots = Vec::new();
    let mut start = date.and_time(opening);
    let close = date.and_time(closing);

    while start + duration <= close {
        let end = start + duration;
        let (slot_start, slot_end) = (start.time(), end.time());

        let taken = booked
            .iter()
            .any(|b| b.start_time < slot_end && slot_start < b.end_time);
        if !taken {
            let hourly_rate = dynamic_rate(base_rate, date, slot_start, factors);
            slots.push(TimeSlot {
                start_time: slot_start,
                end_time: slot_end,
                hourly_rate,
                total_cost: round2(hourly_rate * duration_hours.max(1) as f64),
            });
        }

        start += Duration::hours(1);
    }

    slots
}

/// Free slots of the same length starting on the full hours around a taken slot.
///
/// Starts from two hours before to three hours after the requested hour are tried. A
/// candidate must fit within opening hours and not overlap any of the `booked` slots. The
/// nearest three are returned, earlier first on equal distance.
pub fn alternative_slots(
    date: NaiveDate,
    opening: NaiveTime,
    closing: NaiveTime,
    base_rate: f64,
    start_time: NaiveTime,
    end_time: NaiveTime,
    booked: &[Booking],
) -> Vec<SlotAlternative> {
    let duration = end_time - start_time;
    if duration <= Duration::zero() {
        return Vec::new();
    }

    let factors = PricingFactors {
        demand_factor: demand_factor(opening, closing, booked),
        ..Default::default()
    };
    let requested_hour = date.and_time(start_time)
        - Duration::minutes(start_time.minute() as i64)
        - Duration::seconds(start_time.second() as i64);
    let (open, close) = (date.and_time(opening), date.and_time(closing));

    let mut alternatives: Vec<SlotAlternative> = ALTERNATIVE_OFFSETS
        .iter()
        .filter_map(|&offset| {
            let start = requested_hour + Duration::hours(offset);
            let end = start + duration;
            if start < open || end > close {
                return None;
            }

            let (slot_start, slot_end) = (start.time(), end.time());
            if booked
                .iter()
                .any(|b| b.start_time < slot_end && slot_start < b.end_time)
            {
                return None;
            }

            let hourly_rate = dynamic_rate(base_rate, date, slot_start, factors);
            Some(SlotAlternative {
                start_time: slot_start,
                end_time: slot_end,
                hours_from_requested: offset.unsigned_abs() as u32,
                is_peak_hour: is_peak(slot_start),
                hourly_rate,
                total_cost: round2(hourly_rate * duration.num_minutes() as f64 / 60.0),
            })
        })
        .collect();

    alternatives.sort_by_key(|a| a.hours_from_requested);
    alternatives.truncate(MAX_ALTERNATIVES);
    alternatives
}
