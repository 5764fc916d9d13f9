//! Message factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts a text message into a conversation.
///
/// # Arguments
/// - `db` - Database connection
/// - `conversation_id` - Conversation to post into
/// - `sender_id` - Sending user ID
/// - `content` - Message text
///
/// # Returns
/// - `Ok(entity::message::Model)` - Created message
/// - `Err(DbErr)` - Database error during insert
pub async fn create_message(
    db: &DatabaseConnection,
    conversation_id: i32,
    sender_id: i32,
    content: &str,
) -> Result<entity::message::Model, DbErr> {
    entity::message::ActiveModel {
        conversation_id: ActiveValue::Set(conversation_id),
        sender_id: ActiveValue::Set(sender_id),
        content: ActiveValue::Set(content.to_string()),
        message_type: ActiveValue::Set("text".to_string()),
        reply_to_message_id: ActiveValue::Set(None),
        related_booking_id: ActiveValue::Set(None),
        is_deleted: ActiveValue::Set(false),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
