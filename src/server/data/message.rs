//! Message repository with polling reads and per-recipient read status.
//!
//! Messages are only ever ordered by their insertion-order primary key. Read status rows are
//! inserted, never deleted, so a message that has been read stays read.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, Query},
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::server::model::chat::{CreateMessageParam, Message};

pub struct MessageRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MessageRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a message and bumps the conversation's `updated_at` in one transaction.
    ///
    /// # Returns
    /// - `Ok(Message)` - The stored message
    /// - `Err(DbErr)` - Database error, nothing is stored
    pub async fn create(&self, param: CreateMessageParam) -> Result<Message, DbErr> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let entity = entity::message::ActiveModel {
            conversation_id: ActiveValue::Set(param.conversation_id),
            sender_id: ActiveValue::Set(param.sender_id),
            content: ActiveValue::Set(param.content),
            message_type: ActiveValue::Set(param.message_type.as_str().to_string()),
            reply_to_message_id: ActiveValue::Set(param.reply_to_message_id),
            related_booking_id: ActiveValue::Set(param.related_booking_id),
            is_deleted: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        entity::prelude::Conversation::update_many()
            .col_expr(entity::conversation::Column::UpdatedAt, Expr::value(now))
            .filter(entity::conversation::Column::Id.eq(param.conversation_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Message::from_entity(entity)
    }

    pub async fn find_by_id(&self, message_id: i32) -> Result<Option<Message>, DbErr> {
        entity::prelude::Message::find_by_id(message_id)
            .filter(entity::message::Column::IsDeleted.eq(false))
            .one(self.db)
            .await?
            .map(Message::from_entity)
            .transpose()
    }

    /// Gets messages newer than `since_id`, oldest first. Used for polling.
    pub async fn get_since(&self, conversation_id: i32, since_id: i32) -> Result<Vec<Message>, DbErr> {
        entity::prelude::Message::find()
            .filter(entity::message::Column::ConversationId.eq(conversation_id))
            .filter(entity::message::Column::IsDeleted.eq(false))
            .filter(entity::message::Column::Id.gt(since_id))
            .order_by_asc(entity::message::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Message::from_entity)
            .collect()
    }

    /// Gets one page of history counted from the newest message.
    ///
    /// # Arguments
    /// - `page` - Zero-indexed page, page 0 holds the newest messages
    /// - `per_page` - Messages per page
    ///
    /// # Returns
    /// - `Ok(Vec<Message>)` - The page in ascending ID order
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_page(
        &self,
        conversation_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<Message>, DbErr> {
        let mut messages = entity::prelude::Message::find()
            .filter(entity::message::Column::ConversationId.eq(conversation_id))
            .filter(entity::message::Column::IsDeleted.eq(false))
            .order_by_desc(entity::message::Column::Id)
            .paginate(self.db, per_page)
            .fetch_page(page)
            .await?;
        messages.reverse();

        messages.into_iter().map(Message::from_entity).collect()
    }

    /// Gets the newest message of a conversation.
    pub async fn get_last(&self, conversation_id: i32) -> Result<Option<Message>, DbErr> {
        entity::prelude::Message::find()
            .filter(entity::message::Column::ConversationId.eq(conversation_id))
            .filter(entity::message::Column::IsDeleted.eq(false))
            .order_by_desc(entity::message::Column::Id)
            .one(self.db)
            .await?
            .map(Message::from_entity)
            .transpose()
    }

    /// Counts messages a user sent since a point in time.
    pub async fn count_sent_since(&self, sender_id: i32, since: DateTime<Utc>) -> Result<u64, DbErr> {
        entity::prelude::Message::find()
            .filter(entity::message::Column::SenderId.eq(sender_id))
            .filter(entity::message::Column::CreatedAt.gte(since))
            .count(self.db)
            .await
    }

    /// Marks every message from others in a conversation as read by the user.
    ///
    /// Existing read-status rows are left untouched, so calling this twice inserts nothing
    /// the second time. The participant's `last_read_at` is updated in the same transaction.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of messages newly marked read
    /// - `Err(DbErr)` - Database error, nothing is stored
    pub async fn mark_conversation_read(
        &self,
        conversation_id: i32,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let txn = self.db.begin().await?;

        let unread_ids: Vec<i32> = entity::prelude::Message::find()
            .select_only()
            .column(entity::message::Column::Id)
            .filter(entity::message::Column::ConversationId.eq(conversation_id))
            .filter(entity::message::Column::SenderId.ne(user_id))
            .filter(entity::message::Column::IsDeleted.eq(false))
            .filter(entity::message::Column::Id.not_in_subquery(read_by(user_id)))
            .into_tuple()
            .all(&txn)
            .await?;

        let marked = unread_ids.len() as u64;
        if !unread_ids.is_empty() {
            let rows = unread_ids
                .into_iter()
                .map(|message_id| entity::message_read_status::ActiveModel {
                    message_id: ActiveValue::Set(message_id),
                    user_id: ActiveValue::Set(user_id),
                    read_at: ActiveValue::Set(now),
                    ..Default::default()
                });
            entity::prelude::MessageReadStatus::insert_many(rows)
                .exec(&txn)
                .await?;
        }

        entity::prelude::ConversationParticipant::update_many()
            .col_expr(
                entity::conversation_participant::Column::LastReadAt,
                Expr::value(Some(now)),
            )
            .filter(entity::conversation_participant::Column::ConversationId.eq(conversation_id))
            .filter(entity::conversation_participant::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(marked)
    }

    /// Checks whether a user has a read-status row for a message.
    pub async fn is_read_by(&self, message_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::MessageReadStatus::find()
            .filter(entity::message_read_status::Column::MessageId.eq(message_id))
            .filter(entity::message_read_status::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Counts messages from others, across the user's active conversations, the user has not read.
    pub async fn count_unread(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Message::find()
            .filter(entity::message::Column::ConversationId.in_subquery(
                Query::select()
                    .column(entity::conversation_participant::Column::ConversationId)
                    .from(entity::conversation_participant::Entity)
                    .and_where(entity::conversation_participant::Column::UserId.eq(user_id))
                    .and_where(entity::conversation_participant::Column::IsActive.eq(true))
                    .to_owned(),
            ))
            .filter(entity::message::Column::SenderId.ne(user_id))
            .filter(entity::message::Column::IsDeleted.eq(false))
            .filter(entity::message::Column::Id.not_in_subquery(read_by(user_id)))
            .count(self.db)
            .await
    }

    /// Counts unread messages from others in a single conversation.
    pub async fn count_unread_in(&self, conversation_id: i32, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Message::find()
            .filter(entity::message::Column::ConversationId.eq(conversation_id))
            .filter(entity::message::Column::SenderId.ne(user_id))
            .filter(entity::message::Column::IsDeleted.eq(false))
            .filter(entity::message::Column::Id.not_in_subquery(read_by(user_id)))
            .count(self.db)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::Message::find()
            .filter(entity::message::Column::IsDeleted.eq(false))
            .count(self.db)
            .await
    }
}

/// Subquery selecting the IDs of messages the user has read.
fn read_by(user_id: i32) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(entity::message_read_status::Column::MessageId)
        .from(entity::message_read_status::Entity)
        .and_where(entity::message_read_status::Column::UserId.eq(user_id))
        .to_owned()
}
