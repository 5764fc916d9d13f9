//! Conversations, participants and messages.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::str::FromStr;

use crate::{
    model::chat::{ConversationDto, MessageDto, ParticipantDto},
    server::{error::internal::InternalError, model::user::User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationType {
    Direct,
    Support,
}

impl ConversationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::Direct => "direct",
            ConversationType::Support => "support",
        }
    }
}

impl FromStr for ConversationType {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "direct" => Ok(ConversationType::Direct),
            "support" => Ok(ConversationType::Support),
            _ => Err(InternalError::UnknownVariant {
                kind: "conversation type",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Text,
    System,
    Notification,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::System => "system",
            MessageType::Notification => "notification",
        }
    }
}

impl FromStr for MessageType {
    type Err = InternalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(MessageType::Text),
            "system" => Ok(MessageType::System),
            "notification" => Ok(MessageType::Notification),
            _ => Err(InternalError::UnknownVariant {
                kind: "message type",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: i32,
    pub conversation_type: ConversationType,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn from_entity(entity: entity::conversation::Model) -> Result<Self, DbErr> {
        let conversation_type = ConversationType::from_str(&entity.conversation_type)
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        Ok(Self {
            id: entity.id,
            conversation_type,
            title: entity.title,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub message_type: MessageType,
    pub reply_to_message_id: Option<i32>,
    pub related_booking_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn from_entity(entity: entity::message::Model) -> Result<Self, DbErr> {
        let message_type = MessageType::from_str(&entity.message_type)
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        Ok(Self {
            id: entity.id,
            conversation_id: entity.conversation_id,
            sender_id: entity.sender_id,
            content: entity.content,
            message_type,
            reply_to_message_id: entity.reply_to_message_id,
            related_booking_id: entity.related_booking_id,
            created_at: entity.created_at,
        })
    }

    pub fn into_dto(self) -> MessageDto {
        MessageDto {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            content: self.content,
            message_type: self.message_type.as_str().to_string(),
            reply_to_message_id: self.reply_to_message_id,
            related_booking_id: self.related_booking_id,
            created_at: self.created_at,
        }
    }
}

/// Parameters for storing a message.
#[derive(Debug, Clone)]
pub struct CreateMessageParam {
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub message_type: MessageType,
    pub reply_to_message_id: Option<i32>,
    pub related_booking_id: Option<i32>,
}

/// Conversation list entry for one viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub participants: Vec<User>,
    pub last_message: Option<Message>,
    pub unread_count: u64,
}

impl ConversationSummary {
    pub fn into_dto(self) -> ConversationDto {
        ConversationDto {
            id: self.conversation.id,
            conversation_type: self.conversation.conversation_type.as_str().to_string(),
            title: self.conversation.title,
            participants: self
                .participants
                .into_iter()
                .map(|u| ParticipantDto {
                    user_id: u.id,
                    username: u.username,
                    full_name: u.full_name,
                })
                .collect(),
            last_message: self.last_message.map(Message::into_dto),
            unread_count: self.unread_count,
            updated_at: self.conversation.updated_at,
        }
    }
}
