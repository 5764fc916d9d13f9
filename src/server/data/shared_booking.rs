//! Shared booking proposal repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::shared_booking::{
    AlternativeSlot, CreateSharedBookingParam, SharedBooking, SharedBookingStatus,
};
use crate::server::util::parse::round2;

pub struct SharedBookingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SharedBookingRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a new proposal with the cost split equally between both players.
    ///
    /// # Returns
    /// - `Ok(SharedBooking)` - The proposal in `proposed` status
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateSharedBookingParam) -> Result<SharedBooking, DbErr> {
        let share = round2(param.total_cost / 2.0);
        let entity = entity::shared_booking::ActiveModel {
            player1_id: ActiveValue::Set(param.player1_id),
            player2_id: ActiveValue::Set(param.player2_id),
            court_id: ActiveValue::Set(param.court_id),
            booking_date: ActiveValue::Set(param.booking_date),
            start_time: ActiveValue::Set(param.start_time),
            end_time: ActiveValue::Set(param.end_time),
            status: ActiveValue::Set(SharedBookingStatus::Proposed.as_str().to_string()),
            total_cost: ActiveValue::Set(param.total_cost),
            player1_share: ActiveValue::Set(share),
            player2_share: ActiveValue::Set(share),
            initiator_notes: ActiveValue::Set(param.initiator_notes),
            proposed_at: ActiveValue::Set(Utc::now()),
            expires_at: ActiveValue::Set(param.expires_at),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        SharedBooking::from_entity(entity)
    }

    pub async fn find_by_id(&self, shared_booking_id: i32) -> Result<Option<SharedBooking>, DbErr> {
        entity::prelude::SharedBooking::find_by_id(shared_booking_id)
            .one(self.db)
            .await?
            .map(SharedBooking::from_entity)
            .transpose()
    }

    /// Checks for a proposal awaiting a response between two players in either direction.
    pub async fn pending_exists_between(&self, player_a: i32, player_b: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::SharedBooking::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(entity::shared_booking::Column::Player1Id.eq(player_a))
                            .add(entity::shared_booking::Column::Player2Id.eq(player_b)),
                    )
                    .add(
                        Condition::all()
                            .add(entity::shared_booking::Column::Player1Id.eq(player_b))
                            .add(entity::shared_booking::Column::Player2Id.eq(player_a)),
                    ),
            )
            .filter(
                entity::shared_booking::Column::Status.is_in(SharedBookingStatus::pending_values()),
            )
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Records the partner's response.
    ///
    /// # Arguments
    /// - `status` - `Accepted`, `CounterProposed` or `Cancelled`
    /// - `partner_notes` - Notes from the responding player
    /// - `alternative` - Alternative slot for counter-proposals
    ///
    /// # Returns
    /// - `Ok(Some(SharedBooking))` - Updated proposal
    /// - `Ok(None)` - No proposal with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn record_response(
        &self,
        shared_booking_id: i32,
        status: SharedBookingStatus,
        partner_notes: Option<String>,
        alternative: Option<AlternativeSlot>,
    ) -> Result<Option<SharedBooking>, DbErr> {
        let Some(entity) = entity::prelude::SharedBooking::find_by_id(shared_booking_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::shared_booking::ActiveModel = entity.into();
        active.status = ActiveValue::Set(status.as_str().to_string());
        active.responded_at = ActiveValue::Set(Some(Utc::now()));

        if let Some(alternative) = alternative {
            active.alternative_court_id = ActiveValue::Set(Some(alternative.court_id));
            active.alternative_date = ActiveValue::Set(Some(alternative.date));
            active.alternative_start_time = ActiveValue::Set(Some(alternative.start_time));
            active.alternative_end_time = ActiveValue::Set(Some(alternative.end_time));
            active.alternative_notes = ActiveValue::Set(partner_notes.clone());
        }
        active.partner_notes = ActiveValue::Set(partner_notes);

        let entity = active.update(self.db).await?;
        Ok(Some(SharedBooking::from_entity(entity)?))
    }

    /// Marks a proposal confirmed and links the booking created for it.
    ///
    /// When `adopted` is given, the counter-proposed slot and its cost replace the
    /// original slot in the same update, so a proposal is never left holding a slot
    /// that has no booking behind it.
    pub async fn mark_confirmed(
        &self,
        shared_booking_id: i32,
        final_booking_id: i32,
        adopted: Option<(&AlternativeSlot, f64)>,
    ) -> Result<Option<SharedBooking>, DbErr> {
        let Some(entity) = entity::prelude::SharedBooking::find_by_id(shared_booking_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::shared_booking::ActiveModel = entity.into();
        if let Some((slot, total_cost)) = adopted {
            let share = round2(total_cost / 2.0);
            active.court_id = ActiveValue::Set(slot.court_id);
            active.booking_date = ActiveValue::Set(slot.date);
            active.start_time = ActiveValue::Set(slot.start_time);
            active.end_time = ActiveValue::Set(slot.end_time);
            active.total_cost = ActiveValue::Set(total_cost);
            active.player1_share = ActiveValue::Set(share);
            active.player2_share = ActiveValue::Set(share);
        }
        active.status = ActiveValue::Set(SharedBookingStatus::Confirmed.as_str().to_string());
        active.final_booking_id = ActiveValue::Set(Some(final_booking_id));
        active.confirmed_at = ActiveValue::Set(Some(Utc::now()));

        let entity = active.update(self.db).await?;
        Ok(Some(SharedBooking::from_entity(entity)?))
    }

    /// Sets a proposal's status without touching any other column.
    pub async fn set_status(
        &self,
        shared_booking_id: i32,
        status: SharedBookingStatus,
    ) -> Result<Option<SharedBooking>, DbErr> {
        let Some(entity) = entity::prelude::SharedBooking::find_by_id(shared_booking_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::shared_booking::ActiveModel = entity.into();
        active.status = ActiveValue::Set(status.as_str().to_string());

        let entity = active.update(self.db).await?;
        Ok(Some(SharedBooking::from_entity(entity)?))
    }

    /// Gets all proposals a player takes part in, newest first.
    ///
    /// # Arguments
    /// - `include_expired` - Whether expired proposals are listed
    pub async fn get_for_player(
        &self,
        player_id: i32,
        include_expired: bool,
    ) -> Result<Vec<SharedBooking>, DbErr> {
        let mut query = entity::prelude::SharedBooking::find().filter(
            Condition::any()
                .add(entity::shared_booking::Column::Player1Id.eq(player_id))
                .add(entity::shared_booking::Column::Player2Id.eq(player_id)),
        );
        if !include_expired {
            query = query.filter(
                entity::shared_booking::Column::Status.ne(SharedBookingStatus::Expired.as_str()),
            );
        }

        query
            .order_by_desc(entity::shared_booking::Column::ProposedAt)
            .order_by_desc(entity::shared_booking::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(SharedBooking::from_entity)
            .collect()
    }

    /// Gets unexpired proposals waiting on this player's response, newest first.
    pub async fn get_pending_for_recipient(
        &self,
        player_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<SharedBooking>, DbErr> {
        entity::prelude::SharedBooking::find()
            .filter(entity::shared_booking::Column::Player2Id.eq(player_id))
            .filter(
                entity::shared_booking::Column::Status.is_in(SharedBookingStatus::pending_values()),
            )
            .filter(entity::shared_booking::Column::ExpiresAt.gt(now))
            .order_by_desc(entity::shared_booking::Column::ProposedAt)
            .order_by_desc(entity::shared_booking::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(SharedBooking::from_entity)
            .collect()
    }

    /// Marks every pending proposal whose deadline has passed as expired.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of proposals expired
    /// - `Err(DbErr)` - Database error during update
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::SharedBooking::update_many()
            .col_expr(
                entity::shared_booking::Column::Status,
                Expr::value(SharedBookingStatus::Expired.as_str()),
            )
            .filter(
                entity::shared_booking::Column::Status.is_in(SharedBookingStatus::pending_values()),
            )
            .filter(entity::shared_booking::Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Counts proposals in a status, or all proposals when `None`.
    pub async fn count_by_status(
        &self,
        status: Option<SharedBookingStatus>,
    ) -> Result<u64, DbErr> {
        let mut query = entity::prelude::SharedBooking::find();
        if let Some(status) = status {
            query = query.filter(entity::shared_booking::Column::Status.eq(status.as_str()));
        }

        query.count(self.db).await
    }

    /// Counts proposals still waiting on a response.
    pub async fn count_pending(&self) -> Result<u64, DbErr> {
        entity::prelude::SharedBooking::find()
            .filter(
                entity::shared_booking::Column::Status.is_in(SharedBookingStatus::pending_values()),
            )
            .count(self.db)
            .await
    }
}
