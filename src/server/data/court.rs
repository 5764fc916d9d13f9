//! Court data repository.
//!
//! Provides the `CourtRepository` for creating, updating and searching courts. Search
//! filters that map to columns are applied in SQL; scoring happens in the service layer.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::court::{Court, CourtFilter, CreateCourtParam, UpdateCourtParam};

pub struct CourtRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CourtRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new active court.
    ///
    /// # Arguments
    /// - `param` - Validated court fields
    ///
    /// # Returns
    /// - `Ok(Court)` - The created court
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateCourtParam) -> Result<Court, DbErr> {
        let now = Utc::now();
        let entity = entity::court::ActiveModel {
            owner_id: ActiveValue::Set(param.owner_id),
            name: ActiveValue::Set(param.name),
            description: ActiveValue::Set(param.description),
            location: ActiveValue::Set(param.location),
            address: ActiveValue::Set(param.address),
            latitude: ActiveValue::Set(param.coordinates.map(|c| c.latitude)),
            longitude: ActiveValue::Set(param.coordinates.map(|c| c.longitude)),
            court_type: ActiveValue::Set(param.court_type.as_str().to_string()),
            surface: ActiveValue::Set(param.surface.as_str().to_string()),
            hourly_rate: ActiveValue::Set(param.hourly_rate),
            opening_time: ActiveValue::Set(param.opening_time),
            closing_time: ActiveValue::Set(param.closing_time),
            has_lighting: ActiveValue::Set(param.has_lighting),
            has_parking: ActiveValue::Set(param.has_parking),
            has_equipment_rental: ActiveValue::Set(param.has_equipment_rental),
            has_changing_rooms: ActiveValue::Set(param.has_changing_rooms),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Court::from_entity(entity)
    }

    pub async fn find_by_id(&self, court_id: i32) -> Result<Option<Court>, DbErr> {
        entity::prelude::Court::find_by_id(court_id)
            .one(self.db)
            .await?
            .map(Court::from_entity)
            .transpose()
    }

    /// Gets all courts of an owner ordered by name.
    pub async fn get_by_owner(&self, owner_id: i32) -> Result<Vec<Court>, DbErr> {
        entity::prelude::Court::find()
            .filter(entity::court::Column::OwnerId.eq(owner_id))
            .order_by_asc(entity::court::Column::Name)
            .all(self.db)
            .await?
            .into_iter()
            .map(Court::from_entity)
            .collect()
    }

    /// Counts an owner's courts.
    ///
    /// # Returns
    /// - `Ok((total, active))` - Court counts for the owner
    /// - `Err(DbErr)` - Database error during count queries
    pub async fn count_by_owner(&self, owner_id: i32) -> Result<(u64, u64), DbErr> {
        let total = entity::prelude::Court::find()
            .filter(entity::court::Column::OwnerId.eq(owner_id))
            .count(self.db)
            .await?;
        let active = entity::prelude::Court::find()
            .filter(entity::court::Column::OwnerId.eq(owner_id))
            .filter(entity::court::Column::IsActive.eq(true))
            .count(self.db)
            .await?;

        Ok((total, active))
    }

    /// Counts all courts on the platform.
    ///
    /// # Returns
    /// - `Ok((total, active))` - Court counts
    /// - `Err(DbErr)` - Database error during count queries
    pub async fn count_totals(&self) -> Result<(u64, u64), DbErr> {
        let total = entity::prelude::Court::find().count(self.db).await?;
        let active = entity::prelude::Court::find()
            .filter(entity::court::Column::IsActive.eq(true))
            .count(self.db)
            .await?;

        Ok((total, active))
    }

    /// Checks whether an owner already has a court with this name.
    ///
    /// # Arguments
    /// - `owner_id` - Owning user ID
    /// - `name` - Court name compared exactly
    /// - `exclude_court_id` - Court to ignore, used when renaming
    pub async fn name_exists_for_owner(
        &self,
        owner_id: i32,
        name: &str,
        exclude_court_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = entity::prelude::Court::find()
            .filter(entity::court::Column::OwnerId.eq(owner_id))
            .filter(entity::court::Column::Name.eq(name));

        if let Some(court_id) = exclude_court_id {
            query = query.filter(entity::court::Column::Id.ne(court_id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Searches courts with column filters.
    ///
    /// # Arguments
    /// - `filter` - Location text, price ceiling, court type and surface
    /// - `active_only` - Restrict to active courts
    ///
    /// # Returns
    /// - `Ok(Vec<Court>)` - Matching courts ordered by hourly rate then ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn search(&self, filter: &CourtFilter, active_only: bool) -> Result<Vec<Court>, DbErr> {
        let mut query = entity::prelude::Court::find();

        if active_only {
            query = query.filter(entity::court::Column::IsActive.eq(true));
        }
        if let Some(location) = filter.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(entity::court::Column::Location.contains(location))
                    .add(entity::court::Column::Name.contains(location)),
            );
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(entity::court::Column::HourlyRate.lte(max_price));
        }
        if let Some(court_type) = filter.court_type {
            query = query.filter(entity::court::Column::CourtType.eq(court_type.as_str()));
        }
        if let Some(surface) = filter.surface {
            query = query.filter(entity::court::Column::Surface.eq(surface.as_str()));
        }

        query
            .order_by_asc(entity::court::Column::HourlyRate)
            .order_by_asc(entity::court::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Court::from_entity)
            .collect()
    }

    /// Applies court edits.
    ///
    /// # Returns
    /// - `Ok(Some(Court))` - Updated court
    /// - `Ok(None)` - No court with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(&self, court_id: i32, param: UpdateCourtParam) -> Result<Option<Court>, DbErr> {
        let Some(entity) = entity::prelude::Court::find_by_id(court_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::court::ActiveModel = entity.into();
        if let Some(name) = param.name {
            active.name = ActiveValue::Set(name);
        }
        if let Some(description) = param.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(location) = param.location {
            active.location = ActiveValue::Set(location);
        }
        if let Some(address) = param.address {
            active.address = ActiveValue::Set(Some(address));
        }
        if let Some(coordinates) = param.coordinates {
            active.latitude = ActiveValue::Set(coordinates.map(|c| c.latitude));
            active.longitude = ActiveValue::Set(coordinates.map(|c| c.longitude));
        }
        if let Some(court_type) = param.court_type {
            active.court_type = ActiveValue::Set(court_type.as_str().to_string());
        }
        if let Some(surface) = param.surface {
            active.surface = ActiveValue::Set(surface.as_str().to_string());
        }
        if let Some(hourly_rate) = param.hourly_rate {
            active.hourly_rate = ActiveValue::Set(hourly_rate);
        }
        if let Some(opening_time) = param.opening_time {
            active.opening_time = ActiveValue::Set(opening_time);
        }
        if let Some(closing_time) = param.closing_time {
            active.closing_time = ActiveValue::Set(closing_time);
        }
        if let Some(v) = param.has_lighting {
            active.has_lighting = ActiveValue::Set(v);
        }
        if let Some(v) = param.has_parking {
            active.has_parking = ActiveValue::Set(v);
        }
        if let Some(v) = param.has_equipment_rental {
            active.has_equipment_rental = ActiveValue::Set(v);
        }
        if let Some(v) = param.has_changing_rooms {
            active.has_changing_rooms = ActiveValue::Set(v);
        }
        if let Some(is_active) = param.is_active {
            active.is_active = ActiveValue::Set(is_active);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;
        Ok(Some(Court::from_entity(entity)?))
    }

    /// Activates or deactivates a court.
    pub async fn set_active(&self, court_id: i32, is_active: bool) -> Result<Option<Court>, DbErr> {
        self.update(
            court_id,
            UpdateCourtParam {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }
}
