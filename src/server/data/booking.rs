//! Booking data repository.
//!
//! Provides the `BookingRepository` for court bookings. Inserts go through a transaction that
//! takes a write lock on the court row and re-checks overlaps before writing, so two requests
//! for the same slot cannot both succeed.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};

use crate::server::model::booking::{
    Booking, BookingStatus, BookingWithCourt, CreateBookingParam,
};

/// Outcome of a checked booking insert.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingInsert {
    Created(Booking),
    /// The slot was taken by this booking.
    Conflict(Booking),
}

pub struct BookingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BookingRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a pending booking unless its slot overlaps a pending or confirmed booking.
    ///
    /// Touches the court's `updated_at` first so the transaction holds the write lock for the
    /// court before the overlap query runs. All statements use the transaction handle.
    ///
    /// # Arguments
    /// - `param` - Booking fields, already validated by the rule engine
    ///
    /// # Returns
    /// - `Ok(BookingInsert::Created(Booking))` - The booking was stored
    /// - `Ok(BookingInsert::Conflict(Booking))` - An overlapping booking exists; nothing stored
    /// - `Err(DbErr)` - Database error, the transaction is rolled back
    pub async fn create_checked(&self, param: CreateBookingParam) -> Result<BookingInsert, DbErr> {
        let txn = self.db.begin().await?;

        entity::prelude::Court::update_many()
            .col_expr(entity::court::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::court::Column::Id.eq(param.court_id))
            .exec(&txn)
            .await?;

        if let Some(existing) = find_overlap(
            &txn,
            param.court_id,
            param.booking_date,
            param.start_time,
            param.end_time,
            None,
        )
        .await?
        {
            txn.rollback().await?;
            return Ok(BookingInsert::Conflict(Booking::from_entity(existing)?));
        }

        let entity = entity::booking::ActiveModel {
            court_id: ActiveValue::Set(param.court_id),
            player_id: ActiveValue::Set(param.player_id),
            partner_player_id: ActiveValue::Set(param.partner_player_id),
            booking_date: ActiveValue::Set(param.booking_date),
            start_time: ActiveValue::Set(param.start_time),
            end_time: ActiveValue::Set(param.end_time),
            status: ActiveValue::Set(BookingStatus::Pending.as_str().to_string()),
            notes: ActiveValue::Set(param.notes),
            total_cost: ActiveValue::Set(param.total_cost),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(BookingInsert::Created(Booking::from_entity(entity)?))
    }

    pub async fn find_by_id(&self, booking_id: i32) -> Result<Option<Booking>, DbErr> {
        entity::prelude::Booking::find_by_id(booking_id)
            .one(self.db)
            .await?
            .map(Booking::from_entity)
            .transpose()
    }

    /// Finds a booking together with its court.
    ///
    /// # Returns
    /// - `Ok(Some((Booking, entity::court::Model)))` - Booking and its court
    /// - `Ok(None)` - No booking with that ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_with_court(
        &self,
        booking_id: i32,
    ) -> Result<Option<(Booking, entity::court::Model)>, DbErr> {
        let Some((booking, court)) = entity::prelude::Booking::find_by_id(booking_id)
            .find_also_related(entity::prelude::Court)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let Some(court) = court else {
            return Ok(None);
        };

        Ok(Some((Booking::from_entity(booking)?, court)))
    }

    /// Finds the earliest pending or confirmed booking overlapping a slot.
    ///
    /// # Arguments
    /// - `exclude_booking_id` - Booking to ignore, used when re-validating an existing booking
    pub async fn find_conflict(
        &self,
        court_id: i32,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_booking_id: Option<i32>,
    ) -> Result<Option<Booking>, DbErr> {
        find_overlap(self.db, court_id, date, start_time, end_time, exclude_booking_id)
            .await?
            .map(Booking::from_entity)
            .transpose()
    }

    /// Gets the pending and confirmed bookings of a court on a date, ordered by start time.
    pub async fn get_blocking_for_court(
        &self,
        court_id: i32,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, DbErr> {
        entity::prelude::Booking::find()
            .filter(entity::booking::Column::CourtId.eq(court_id))
            .filter(entity::booking::Column::BookingDate.eq(date))
            .filter(entity::booking::Column::Status.is_in(blocking_statuses()))
            .order_by_asc(entity::booking::Column::StartTime)
            .all(self.db)
            .await?
            .into_iter()
            .map(Booking::from_entity)
            .collect()
    }

    /// Moves a booking to a new status and records the matching timestamp and reason.
    ///
    /// The update only applies while the booking is still in one of the `from` statuses, so
    /// two concurrent decisions on the same booking cannot both succeed.
    ///
    /// # Arguments
    /// - `booking_id` - Booking to update
    /// - `from` - Statuses the booking must currently have
    /// - `status` - `Confirmed`, `Rejected` or `Cancelled`
    /// - `reason` - Stored as the rejection or cancellation reason
    ///
    /// # Returns
    /// - `Ok(Some(Booking))` - Updated booking
    /// - `Ok(None)` - No booking with that ID in one of the `from` statuses
    /// - `Err(DbErr)` - Database error during update
    pub async fn update_status(
        &self,
        booking_id: i32,
        from: &[BookingStatus],
        status: BookingStatus,
        reason: Option<String>,
    ) -> Result<Option<Booking>, DbErr> {
        let now = Utc::now();
        let mut update = entity::prelude::Booking::update_many()
            .col_expr(entity::booking::Column::Status, Expr::value(status.as_str()));
        update = match status {
            BookingStatus::Confirmed => {
                update.col_expr(entity::booking::Column::ApprovedAt, Expr::value(Some(now)))
            }
            BookingStatus::Rejected => update
                .col_expr(entity::booking::Column::RejectedAt, Expr::value(Some(now)))
                .col_expr(entity::booking::Column::RejectionReason, Expr::value(reason)),
            BookingStatus::Cancelled => update
                .col_expr(entity::booking::Column::CancelledAt, Expr::value(Some(now)))
                .col_expr(entity::booking::Column::CancellationReason, Expr::value(reason)),
            BookingStatus::Pending => update,
        };

        let result = update
            .filter(entity::booking::Column::Id.eq(booking_id))
            .filter(entity::booking::Column::Status.is_in(from.iter().map(|s| s.as_str())))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(booking_id).await
    }

    /// Gets bookings where the player is the booker or the partner.
    ///
    /// # Arguments
    /// - `player_id` - Player profile ID
    /// - `from` / `to` - Optional inclusive booking date bounds
    ///
    /// # Returns
    /// - `Ok(Vec<BookingWithCourt>)` - Bookings ordered by date and start time
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_for_player(
        &self,
        player_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<BookingWithCourt>, DbErr> {
        let mut query = entity::prelude::Booking::find().filter(
            Condition::any()
                .add(entity::booking::Column::PlayerId.eq(player_id))
                .add(entity::booking::Column::PartnerPlayerId.eq(player_id)),
        );
        if let Some(from) = from {
            query = query.filter(entity::booking::Column::BookingDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(entity::booking::Column::BookingDate.lte(to));
        }

        let rows = query
            .find_also_related(entity::prelude::Court)
            .order_by_asc(entity::booking::Column::BookingDate)
            .order_by_asc(entity::booking::Column::StartTime)
            .all(self.db)
            .await?;

        with_court_names(rows)
    }

    /// Gets a player's pending and confirmed bookings from a date on.
    pub async fn get_upcoming_for_player(
        &self,
        player_id: i32,
        from: NaiveDate,
        limit: u64,
    ) -> Result<Vec<BookingWithCourt>, DbErr> {
        let rows = entity::prelude::Booking::find()
            .filter(
                Condition::any()
                    .add(entity::booking::Column::PlayerId.eq(player_id))
                    .add(entity::booking::Column::PartnerPlayerId.eq(player_id)),
            )
            .filter(entity::booking::Column::BookingDate.gte(from))
            .filter(entity::booking::Column::Status.is_in(blocking_statuses()))
            .find_also_related(entity::prelude::Court)
            .order_by_asc(entity::booking::Column::BookingDate)
            .order_by_asc(entity::booking::Column::StartTime)
            .limit(limit)
            .all(self.db)
            .await?;

        with_court_names(rows)
    }

    /// Gets bookings on all courts of an owner.
    ///
    /// # Arguments
    /// - `owner_id` - Owning user ID
    /// - `status` - Optional status filter
    /// - `from` / `to` - Optional inclusive booking date bounds
    ///
    /// # Returns
    /// - `Ok(Vec<BookingWithCourt>)` - Bookings ordered by date and start time
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_for_owner(
        &self,
        owner_id: i32,
        status: Option<BookingStatus>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<BookingWithCourt>, DbErr> {
        let mut query = entity::prelude::Booking::find()
            .find_also_related(entity::prelude::Court)
            .filter(entity::court::Column::OwnerId.eq(owner_id));

        if let Some(status) = status {
            query = query.filter(entity::booking::Column::Status.eq(status.as_str()));
        }
        if let Some(from) = from {
            query = query.filter(entity::booking::Column::BookingDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(entity::booking::Column::BookingDate.lte(to));
        }

        let rows = query
            .order_by_asc(entity::booking::Column::BookingDate)
            .order_by_asc(entity::booking::Column::StartTime)
            .all(self.db)
            .await?;

        with_court_names(rows)
    }

    /// Counts pending booking requests on an owner's courts.
    pub async fn count_pending_for_owner(&self, owner_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Booking::find()
            .inner_join(entity::prelude::Court)
            .filter(entity::court::Column::OwnerId.eq(owner_id))
            .filter(entity::booking::Column::Status.eq(BookingStatus::Pending.as_str()))
            .count(self.db)
            .await
    }

    /// Counts bookings made by each of the given players.
    ///
    /// # Returns
    /// - `Ok(HashMap<i32, u64>)` - Booking count per player ID; players without bookings are absent
    /// - `Err(DbErr)` - Database error during query
    pub async fn count_by_players(&self, player_ids: &[i32]) -> Result<HashMap<i32, u64>, DbErr> {
        if player_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i32> = entity::prelude::Booking::find()
            .select_only()
            .column(entity::booking::Column::PlayerId)
            .filter(entity::booking::Column::PlayerId.is_in(player_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        let mut counts = HashMap::new();
        for id in ids {
            *counts.entry(id).or_insert(0) += 1;
        }

        Ok(counts)
    }

    /// Counts bookings in a status across the platform, or all bookings when `None`.
    pub async fn count_by_status(&self, status: Option<BookingStatus>) -> Result<u64, DbErr> {
        let mut query = entity::prelude::Booking::find();
        if let Some(status) = status {
            query = query.filter(entity::booking::Column::Status.eq(status.as_str()));
        }

        query.count(self.db).await
    }

    /// Sums the cost of all confirmed bookings.
    pub async fn total_confirmed_revenue(&self) -> Result<f64, DbErr> {
        let costs: Vec<f64> = entity::prelude::Booking::find()
            .select_only()
            .column(entity::booking::Column::TotalCost)
            .filter(entity::booking::Column::Status.eq(BookingStatus::Confirmed.as_str()))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(costs.into_iter().sum())
    }
}

fn blocking_statuses() -> [&'static str; 2] {
    [
        BookingStatus::Pending.as_str(),
        BookingStatus::Confirmed.as_str(),
    ]
}

/// Overlap query shared by the checked insert and the rule engine.
///
/// Two slots overlap when `existing.start < new.end && new.start < existing.end`.
async fn find_overlap<C: ConnectionTrait>(
    conn: &C,
    court_id: i32,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    exclude_booking_id: Option<i32>,
) -> Result<Option<entity::booking::Model>, DbErr> {
    let mut query = entity::prelude::Booking::find()
        .filter(entity::booking::Column::CourtId.eq(court_id))
        .filter(entity::booking::Column::BookingDate.eq(date))
        .filter(entity::booking::Column::Status.is_in(blocking_statuses()))
        .filter(entity::booking::Column::StartTime.lt(end_time))
        .filter(entity::booking::Column::EndTime.gt(start_time));

    if let Some(booking_id) = exclude_booking_id {
        query = query.filter(entity::booking::Column::Id.ne(booking_id));
    }

    query
        .order_by_asc(entity::booking::Column::StartTime)
        .one(conn)
        .await
}

fn with_court_names(
    rows: Vec<(entity::booking::Model, Option<entity::court::Model>)>,
) -> Result<Vec<BookingWithCourt>, DbErr> {
    rows.into_iter()
        .map(|(booking, court)| {
            Ok(BookingWithCourt {
                booking: Booking::from_entity(booking)?,
                court_name: court.map(|c| c.name).unwrap_or_default(),
            })
        })
        .collect()
}
