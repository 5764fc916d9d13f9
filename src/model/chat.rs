use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct StartConversationDto {
    pub recipient_user_id: i32,
    /// Optional first message
    pub content: Option<String>,
}

/// Opens a support conversation between the current player and a court owner.
#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct StartSupportDto {
    pub owner_user_id: i32,
    pub content: Option<String>,
}

/// A user who can be messaged, without contact details.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ContactDto {
    pub user_id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub role: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct SendMessageDto {
    pub content: String,
    pub reply_to_message_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct MessageDto {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub message_type: String,
    pub reply_to_message_id: Option<i32>,
    pub related_booking_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ParticipantDto {
    pub user_id: i32,
    pub username: String,
    pub full_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ConversationDto {
    pub id: i32,
    pub conversation_type: String,
    pub title: Option<String>,
    pub participants: Vec<ParticipantDto>,
    pub last_message: Option<MessageDto>,
    pub unread_count: u64,
    pub updated_at: DateTime<Utc>,
}

/// Conversation opened or reused by `start`, with the first message when one was sent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct StartedConversationDto {
    pub conversation_id: i32,
    pub message: Option<MessageDto>,
}

/// Messages returned to a polling client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct MessagesDto {
    pub messages: Vec<MessageDto>,
    /// Highest message ID in `messages`, to send back as `since_id`
    pub last_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct UnreadCountDto {
    pub unread_count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct MarkReadDto {
    pub marked: u64,
}
