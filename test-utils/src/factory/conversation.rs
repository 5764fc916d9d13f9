//! Conversation factory for creating conversations with participants.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a conversation of the given type with the given participants.
///
/// # Arguments
/// - `db` - Database connection
/// - `conversation_type` - `direct` or `support`
/// - `user_ids` - Users added as active participants
///
/// # Returns
/// - `Ok(entity::conversation::Model)` - Created conversation
/// - `Err(DbErr)` - Database error during insert
pub async fn create_conversation(
    db: &DatabaseConnection,
    conversation_type: &str,
    user_ids: &[i32],
) -> Result<entity::conversation::Model, DbErr> {
    let now = Utc::now();
    let conversation = entity::conversation::ActiveModel {
        conversation_type: ActiveValue::Set(conversation_type.to_string()),
        title: ActiveValue::Set(None),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for user_id in user_ids {
        entity::conversation_participant::ActiveModel {
            conversation_id: ActiveValue::Set(conversation.id),
            user_id: ActiveValue::Set(*user_id),
            role: ActiveValue::Set("participant".to_string()),
            joined_at: ActiveValue::Set(now),
            last_read_at: ActiveValue::Set(None),
            is_active: ActiveValue::Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(conversation)
}

/// Creates a direct conversation between two users.
pub async fn create_direct_conversation(
    db: &DatabaseConnection,
    user_a: i32,
    user_b: i32,
) -> Result<entity::conversation::Model, DbErr> {
    create_conversation(db, "direct", &[user_a, user_b]).await
}
