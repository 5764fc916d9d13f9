//! Player matching and court recommendations.
//!
//! Both are single-pass weighted scores over rows loaded from the database. The scoring
//! functions are pure so their properties can be tested without a database.

use chrono::NaiveTime;
use sea_orm::DatabaseConnection;
use std::cmp::Ordering;

use crate::server::{
    data::{booking::BookingRepository, court::CourtRepository, player::PlayerRepository},
    error::AppError,
    model::{
        court::{Court, CourtFilter},
        matching::{
            CourtRecommendation, CourtRecommendationFilters, CourtScoreBreakdown, CourtSort,
            MatchFilters, MatchResults, MatchScore, PlayerMatch,
        },
        player::{Availability, Player},
    },
    service::{pricing::available_slots, rule::MAX_SKILL_LEVEL_DIFFERENCE},
    util::{geo::distance_between, parse::round1},
};

const DEFAULT_LIMIT: usize = 10;
/// Widest radius tried before the distance filter is dropped.
pub const MAX_SEARCH_RADIUS_KM: f64 = 200.0;
/// Lowest score offered as a partner suggestion.
pub const PARTNER_SUGGESTION_THRESHOLD: f64 = 70.0;
/// Lowest score kept when courts are sorted by recommendation.
pub const MIN_RECOMMENDED_COURT_SCORE: f64 = 30.0;

const SKILL_WEIGHT: f64 = 0.4;
const LOCATION_WEIGHT: f64 = 0.3;
const AVAILABILITY_WEIGHT: f64 = 0.2;
const ACTIVITY_WEIGHT: f64 = 0.1;

/// Location score for a distance in kilometres; unknown distances score 50.
pub fn distance_score(distance_km: Option<f64>) -> f64 {
    match distance_km {
        None => 50.0,
        Some(d) if d <= 2.0 => 100.0,
        Some(d) if d <= 5.0 => 90.0,
        Some(d) if d <= 10.0 => 75.0,
        Some(d) if d <= 20.0 => 50.0,
        Some(d) if d <= 35.0 => 25.0,
        Some(_) => 10.0,
    }
}

/// 100 for equal levels, 30 less per level of difference.
pub fn skill_score(level_difference: i32) -> f64 {
    (100.0 - 30.0 * level_difference.abs() as f64).max(0.0)
}

/// 100 for the same availability, 80 when one side is flexible, otherwise 60.
pub fn availability_score(a: Option<Availability>, b: Option<Availability>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 100.0,
        (Some(Availability::Flexible), _) | (_, Some(Availability::Flexible)) => 80.0,
        _ => 60.0,
    }
}

/// Grows with the candidate's bookings relative to the requester's, capped at 100.
pub fn activity_score(candidate_bookings: u64, own_bookings: u64) -> f64 {
    (50.0 + 50.0 * candidate_bookings as f64 / own_bookings.max(1) as f64).min(100.0)
}

/// Case-insensitive comparison of two free-text locations.
///
/// 100 when equal, 75 when one contains the other, 50 otherwise or when either is missing.
pub fn text_location_score(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (normalized(a), normalized(b)) else {
        return 50.0;
    };

    if a == b {
        100.0
    } else if a.contains(&b) || b.contains(&a) {
        75.0
    } else {
        50.0
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

fn locations_match(a: Option<&str>, b: Option<&str>) -> bool {
    text_location_score(a, b) > 50.0
}

/// Scores a candidate against the requesting player.
///
/// Uses the distance when both sides have coordinates and the text locations otherwise.
pub fn score_candidate(
    player: &Player,
    candidate: &Player,
    distance_km: Option<f64>,
    own_bookings: u64,
    candidate_bookings: u64,
) -> MatchScore {
    let skill = skill_score(player.skill_level.difference(&candidate.skill_level));
    let location = match distance_km {
        Some(_) => distance_score(distance_km),
        None => text_location_score(
            player.preferred_location.as_deref(),
            candidate.preferred_location.as_deref(),
        ),
    };
    let availability = availability_score(player.availability, candidate.availability);
    let activity = activity_score(candidate_bookings, own_bookings);

    MatchScore {
        skill,
        location,
        availability,
        activity,
        total: round1(
            skill * SKILL_WEIGHT
                + location * LOCATION_WEIGHT
                + availability * AVAILABILITY_WEIGHT
                + activity * ACTIVITY_WEIGHT,
        ),
    }
}

/// Short explanation of why a match is suggested, at most three parts.
pub fn match_reason(m: &PlayerMatch) -> String {
    let mut reasons = vec![if m.score.total >= 90.0 {
        "Excellent compatibility"
    } else if m.score.total >= 80.0 {
        "Very good match"
    } else {
        "Good potential match"
    }];

    if m.distance_km.is_some_and(|d| d <= 10.0) {
        reasons.push("nearby location");
    }
    if m.score.activity >= 100.0 {
        reasons.push("active player");
    }
    if m.score.availability >= 100.0 {
        reasons.push("same availability");
    }

    reasons.truncate(3);
    reasons.join(", ")
}

fn compare_matches(a: &PlayerMatch, b: &PlayerMatch) -> Ordering {
    b.score
        .total
        .total_cmp(&a.score.total)
        .then_with(|| compare_distance(a.distance_km, b.distance_km))
        .then_with(|| a.candidate.player.id.cmp(&b.candidate.player.id))
}

/// Ascending, unknown distances last.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn evening_close() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Preference, distance, value and amenity parts of a court's score.
///
/// The availability part needs bookings and is added by the caller.
pub fn score_court(
    player: &Player,
    court: &Court,
    distance_km: Option<f64>,
    mean_price: f64,
) -> CourtScoreBreakdown {
    let location_match = locations_match(
        player.preferred_location.as_deref(),
        Some(court.location.as_str()),
    );

    let mut preference = 0.0;
    if let Some(preferred) = normalized(player.preferred_court_type.as_deref()) {
        if preferred == court.surface.as_str() || preferred == court.court_type.as_str() {
            preference += 10.0;
        }
    }
    if location_match {
        preference += 10.0;
    }
    let hours_fit = match player.availability {
        Some(Availability::Evenings) => court.closing_time >= evening_close(),
        _ => true,
    };
    if hours_fit {
        preference += 10.0;
    }

    let max_travel = player.max_travel_distance.max(1) as f64;
    let distance = match distance_km {
        Some(d) if d <= 5.0 => 25.0,
        Some(d) if d <= 10.0 => 20.0,
        Some(d) if d <= max_travel => (15.0 * (1.0 - d / max_travel)).max(5.0),
        Some(_) => 5.0,
        None if location_match => 20.0,
        None => 10.0,
    };

    let value = if mean_price > 0.0 {
        match court.hourly_rate / mean_price {
            r if r <= 0.8 => 15.0,
            r if r <= 1.0 => 10.0,
            r if r <= 1.2 => 5.0,
            _ => 0.0,
        }
    } else {
        10.0
    };

    CourtScoreBreakdown {
        preference,
        distance,
        availability: 10.0,
        value,
        amenities: 2.5 * court.amenity_count() as f64,
    }
}

/// Extra availability points for the number of free hourly slots on the requested date.
pub fn slot_bonus(free_slots: usize) -> f64 {
    match free_slots {
        n if n >= 8 => 10.0,
        n if n >= 4 => 5.0,
        n if n >= 1 => 2.0,
        _ => 0.0,
    }
}

pub struct MatchingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MatchingService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ranks other active players by compatibility.
    ///
    /// Candidates are players within `MAX_SKILL_LEVEL_DIFFERENCE` levels that pass the
    /// filters. When none lie within the search radius it doubles up to
    /// `MAX_SEARCH_RADIUS_KM`, after which distance stops filtering. Candidates without
    /// coordinates are always in range and scored on their text location.
    ///
    /// # Returns
    /// - `Ok(MatchResults)` - Matches sorted by score, then distance, then player ID
    /// - `Err(AppError::NotFound)` - Unknown player
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn find_matches(
        &self,
        player_id: i32,
        filters: MatchFilters,
    ) -> Result<MatchResults, AppError> {
        let player = self.player(player_id).await?;
        let limit = effective_limit(filters.limit);
        let mut radius = filters
            .max_distance
            .unwrap_or(player.max_travel_distance as f64)
            .max(1.0);

        let pool: Vec<_> = PlayerRepository::new(self.db)
            .get_active_candidates(player.id)
            .await?
            .into_iter()
            .filter(|c| {
                player.skill_level.difference(&c.player.skill_level) <= MAX_SKILL_LEVEL_DIFFERENCE
            })
            .filter(|c| {
                filters
                    .skill_level
                    .is_none_or(|level| c.player.skill_level == level)
            })
            .filter(|c| {
                filters
                    .availability
                    .is_none_or(|a| c.player.availability == Some(a))
            })
            .collect();

        if pool.is_empty() {
            return Ok(MatchResults {
                matches: Vec::new(),
                search_radius_km: Some(radius),
                radius_expanded: false,
            });
        }

        let mut ids: Vec<i32> = pool.iter().map(|c| c.player.id).collect();
        ids.push(player.id);
        let counts = BookingRepository::new(self.db).count_by_players(&ids).await?;
        let own_bookings = counts.get(&player.id).copied().unwrap_or(0);

        let scored: Vec<PlayerMatch> = pool
            .into_iter()
            .map(|candidate| {
                let distance_km = distance_between(player.coordinates, candidate.player.coordinates);
                let score = score_candidate(
                    &player,
                    &candidate.player,
                    distance_km,
                    own_bookings,
                    counts.get(&candidate.player.id).copied().unwrap_or(0),
                );
                PlayerMatch {
                    candidate,
                    distance_km,
                    score,
                    reason: None,
                }
            })
            .collect();

        let mut expanded = false;
        let (mut matches, search_radius_km) = loop {
            let in_range: Vec<PlayerMatch> = scored
                .iter()
                .filter(|m| m.distance_km.is_none_or(|d| d <= radius))
                .cloned()
                .collect();

            if !in_range.is_empty() {
                break (in_range, Some(radius));
            }
            expanded = true;
            if radius >= MAX_SEARCH_RADIUS_KM {
                break (scored, None);
            }
            radius = (radius * 2.0).min(MAX_SEARCH_RADIUS_KM);
        };

        if expanded {
            tracing::debug!(
                "Widened match search for player {} to {:?} km",
                player.id,
                search_radius_km
            );
        }

        matches.sort_by(compare_matches);
        matches.truncate(limit);

        Ok(MatchResults {
            matches,
            search_radius_km,
            radius_expanded: expanded,
        })
    }

    /// Highly compatible players with a short reason for each.
    pub async fn suggest_partners(
        &self,
        player_id: i32,
        limit: usize,
    ) -> Result<Vec<PlayerMatch>, AppError> {
        let limit = effective_limit(limit);
        let results = self
            .find_matches(
                player_id,
                MatchFilters {
                    limit: limit * 2,
                    ..Default::default()
                },
            )
            .await?;

        Ok(results
            .matches
            .into_iter()
            .filter(|m| m.score.total >= PARTNER_SUGGESTION_THRESHOLD)
            .take(limit)
            .map(|mut m| {
                m.reason = Some(match_reason(&m));
                m
            })
            .collect())
    }

    /// Scores active courts for a player.
    ///
    /// # Returns
    /// - `Ok(Vec<CourtRecommendation>)` - Courts in the requested order; the `Recommended`
    ///   order drops courts scoring under `MIN_RECOMMENDED_COURT_SCORE`
    /// - `Err(AppError::NotFound)` - Unknown player
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn recommend_courts(
        &self,
        player_id: i32,
        filters: CourtRecommendationFilters,
    ) -> Result<Vec<CourtRecommendation>, AppError> {
        let player = self.player(player_id).await?;

        let courts: Vec<(Court, Option<f64>)> = CourtRepository::new(self.db)
            .search(
                &CourtFilter {
                    location: filters.location.clone(),
                    max_price: filters.max_price,
                    court_type: filters.court_type,
                    surface: filters.surface,
                },
                true,
            )
            .await?
            .into_iter()
            .map(|court| {
                let distance = distance_between(player.coordinates, court.coordinates);
                (court, distance)
            })
            .filter(|(_, distance)| match (filters.max_distance, distance) {
                (Some(max), Some(d)) => *d <= max,
                _ => true,
            })
            .collect();

        if courts.is_empty() {
            return Ok(Vec::new());
        }

        let mean_price =
            courts.iter().map(|(c, _)| c.hourly_rate).sum::<f64>() / courts.len() as f64;
        let booking_repo = BookingRepository::new(self.db);

        let mut recommendations = Vec::with_capacity(courts.len());
        for (court, distance_km) in courts {
            let mut breakdown = score_court(&player, &court, distance_km, mean_price);

            let free_slots = match filters.date {
                Some(date) => {
                    let booked = booking_repo.get_blocking_for_court(court.id, date).await?;
                    let slots = available_slots(
                        date,
                        court.opening_time,
                        court.closing_time,
                        court.hourly_rate,
                        1,
                        &booked,
                    );
                    Some(slots.len())
                }
                None => None,
            };
            if let Some(free) = free_slots {
                breakdown.availability += slot_bonus(free);
            }

            recommendations.push(CourtRecommendation {
                score: round1(breakdown.total()),
                court,
                distance_km,
                breakdown,
                available_slots: free_slots,
            });
        }

        match filters.sort {
            CourtSort::Recommended => {
                recommendations.retain(|r| r.score >= MIN_RECOMMENDED_COURT_SCORE);
                recommendations.sort_by(|a, b| {
                    b.score.total_cmp(&a.score).then(a.court.id.cmp(&b.court.id))
                });
            }
            CourtSort::PriceLow => recommendations.sort_by(|a, b| {
                a.court
                    .hourly_rate
                    .total_cmp(&b.court.hourly_rate)
                    .then(a.court.id.cmp(&b.court.id))
            }),
            CourtSort::PriceHigh => recommendations.sort_by(|a, b| {
                b.court
                    .hourly_rate
                    .total_cmp(&a.court.hourly_rate)
                    .then(a.court.id.cmp(&b.court.id))
            }),
            CourtSort::Distance => recommendations.sort_by(|a, b| {
                compare_distance(a.distance_km, b.distance_km).then(a.court.id.cmp(&b.court.id))
            }),
        }

        recommendations.truncate(effective_limit(filters.limit));
        Ok(recommendations)
    }

    async fn player(&self, player_id: i32) -> Result<Player, AppError> {
        PlayerRepository::new(self.db)
            .find_by_id(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))
    }
}

fn effective_limit(limit: usize) -> usize {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit
    }
}
