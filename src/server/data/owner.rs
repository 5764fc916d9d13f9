//! Court owner profile repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter,
};

use crate::server::model::user::Owner;

pub struct OwnerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OwnerRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the owner profile for a user.
    pub async fn create(&self, user_id: i32, business_name: Option<String>) -> Result<Owner, DbErr> {
        insert_owner(self.db, user_id, business_name).await
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Owner>, DbErr> {
        let entity = entity::prelude::Owner::find()
            .filter(entity::owner::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        Ok(entity.map(Owner::from_entity))
    }
}

pub(super) async fn insert_owner<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    business_name: Option<String>,
) -> Result<Owner, DbErr> {
    let entity = entity::owner::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        business_name: ActiveValue::Set(business_name),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(Owner::from_entity(entity))
}
