//! Conversation and participant repository.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::server::model::{
    chat::{Conversation, ConversationType},
    user::User,
};

const PARTICIPANT_ROLE_MEMBER: &str = "member";

pub struct ConversationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ConversationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a conversation and its participants in one transaction.
    ///
    /// # Arguments
    /// - `conversation_type` - Direct or support
    /// - `title` - Optional display title
    /// - `user_ids` - Participant user IDs
    ///
    /// # Returns
    /// - `Ok(Conversation)` - The created conversation
    /// - `Err(DbErr)` - Database error, nothing is stored
    pub async fn create(
        &self,
        conversation_type: ConversationType,
        title: Option<String>,
        user_ids: &[i32],
    ) -> Result<Conversation, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let conversation = entity::conversation::ActiveModel {
            conversation_type: ActiveValue::Set(conversation_type.as_str().to_string()),
            title: ActiveValue::Set(title),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for user_id in user_ids {
            entity::conversation_participant::ActiveModel {
                conversation_id: ActiveValue::Set(conversation.id),
                user_id: ActiveValue::Set(*user_id),
                role: ActiveValue::Set(PARTICIPANT_ROLE_MEMBER.to_string()),
                joined_at: ActiveValue::Set(now),
                last_read_at: ActiveValue::Set(None),
                is_active: ActiveValue::Set(true),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Conversation::from_entity(conversation)
    }

    pub async fn find_by_id(&self, conversation_id: i32) -> Result<Option<Conversation>, DbErr> {
        entity::prelude::Conversation::find_by_id(conversation_id)
            .one(self.db)
            .await?
            .map(Conversation::from_entity)
            .transpose()
    }

    /// Finds the conversation of a type whose active participants are exactly the two users.
    pub async fn find_between(
        &self,
        conversation_type: ConversationType,
        user_a: i32,
        user_b: i32,
    ) -> Result<Option<Conversation>, DbErr> {
        let candidates = self
            .get_for_user(user_a)
            .await?
            .into_iter()
            .filter(|c| c.conversation_type == conversation_type)
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return Ok(None);
        }

        let ids: Vec<i32> = candidates.iter().map(|c| c.id).collect();
        let members = self.get_participant_ids(&ids).await?;
        let wanted: HashSet<i32> = [user_a, user_b].into_iter().collect();

        Ok(candidates.into_iter().find(|c| {
            members
                .get(&c.id)
                .map(|ids| ids.iter().copied().collect::<HashSet<_>>() == wanted)
                .unwrap_or(false)
        }))
    }

    /// Gets the conversations a user actively participates in, most recently updated first.
    pub async fn get_for_user(&self, user_id: i32) -> Result<Vec<Conversation>, DbErr> {
        entity::prelude::Conversation::find()
            .inner_join(entity::prelude::ConversationParticipant)
            .filter(entity::conversation_participant::Column::UserId.eq(user_id))
            .filter(entity::conversation_participant::Column::IsActive.eq(true))
            .order_by_desc(entity::conversation::Column::UpdatedAt)
            .order_by_desc(entity::conversation::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Conversation::from_entity)
            .collect()
    }

    /// Gets every conversation, most recently updated first.
    pub async fn get_all(&self) -> Result<Vec<Conversation>, DbErr> {
        entity::prelude::Conversation::find()
            .order_by_desc(entity::conversation::Column::UpdatedAt)
            .order_by_desc(entity::conversation::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Conversation::from_entity)
            .collect()
    }

    /// Checks whether a user is an active participant of a conversation.
    pub async fn is_participant(&self, conversation_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::ConversationParticipant::find()
            .filter(entity::conversation_participant::Column::ConversationId.eq(conversation_id))
            .filter(entity::conversation_participant::Column::UserId.eq(user_id))
            .filter(entity::conversation_participant::Column::IsActive.eq(true))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Gets active participant user IDs keyed by conversation ID.
    pub async fn get_participant_ids(
        &self,
        conversation_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
        let participants = entity::prelude::ConversationParticipant::find()
            .filter(
                entity::conversation_participant::Column::ConversationId
                    .is_in(conversation_ids.iter().copied()),
            )
            .filter(entity::conversation_participant::Column::IsActive.eq(true))
            .order_by_asc(entity::conversation_participant::Column::Id)
            .all(self.db)
            .await?;

        let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
        for participant in participants {
            map.entry(participant.conversation_id)
                .or_default()
                .push(participant.user_id);
        }

        Ok(map)
    }

    /// Gets active participants with their user records keyed by conversation ID.
    pub async fn get_participants(
        &self,
        conversation_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<User>>, DbErr> {
        let rows = entity::prelude::ConversationParticipant::find()
            .filter(
                entity::conversation_participant::Column::ConversationId
                    .is_in(conversation_ids.iter().copied()),
            )
            .filter(entity::conversation_participant::Column::IsActive.eq(true))
            .find_also_related(entity::prelude::User)
            .order_by_asc(entity::conversation_participant::Column::Id)
            .all(self.db)
            .await?;

        let mut map: HashMap<i32, Vec<User>> = HashMap::new();
        for (participant, user) in rows {
            if let Some(user) = user {
                map.entry(participant.conversation_id)
                    .or_default()
                    .push(User::from_entity(user)?);
            }
        }

        Ok(map)
    }

    /// Bumps `updated_at` so the conversation sorts first in listings.
    pub async fn touch(&self, conversation_id: i32, now: DateTime<Utc>) -> Result<(), DbErr> {
        entity::prelude::Conversation::update_many()
            .col_expr(entity::conversation::Column::UpdatedAt, Expr::value(now))
            .filter(entity::conversation::Column::Id.eq(conversation_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Records when a participant last read a conversation.
    pub async fn set_last_read(
        &self,
        conversation_id: i32,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::ConversationParticipant::update_many()
            .col_expr(
                entity::conversation_participant::Column::LastReadAt,
                Expr::value(Some(now)),
            )
            .filter(entity::conversation_participant::Column::ConversationId.eq(conversation_id))
            .filter(entity::conversation_participant::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::Conversation::find().count(self.db).await
    }
}
