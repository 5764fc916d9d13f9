//! Conversations and polling-based messaging.
//!
//! Clients poll `get_messages` with the highest message ID they have seen. Insertion order of
//! the message primary key is the only ordering guarantee.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{conversation::ConversationRepository, message::MessageRepository, user::UserRepository},
    error::{rule::RuleViolation, AppError},
    model::{
        chat::{
            Conversation, ConversationSummary, ConversationType, CreateMessageParam, Message,
            MessageType,
        },
        user::{Role, User},
    },
    service::rule::RuleEngine,
};

/// Messages per page when paging backwards through history.
pub const MESSAGES_PER_PAGE: u64 = 50;
/// Users returned by one directory search.
const DIRECTORY_LIMIT: u64 = 20;
const SUPPORT_TITLE: &str = "Court support";

pub struct ChatService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ChatService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the direct conversation between two users, creating it when missing.
    ///
    /// # Returns
    /// - `Ok(Conversation)` - Existing or newly created conversation
    /// - `Err(RuleViolation::MessageToSelf)` - Both users are the same
    /// - `Err(RuleViolation::InvalidRecipient)` - `user_b` does not exist or is inactive
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn get_or_create_direct_conversation(
        &self,
        user_a: i32,
        user_b: i32,
    ) -> Result<Conversation, AppError> {
        if user_a == user_b {
            return Err(RuleViolation::MessageToSelf.into());
        }

        let recipient = UserRepository::new(self.db).find_by_id(user_b).await?;
        if !recipient.is_some_and(|u| u.is_active) {
            return Err(RuleViolation::InvalidRecipient.into());
        }

        let conversation_repo = ConversationRepository::new(self.db);
        if let Some(conversation) = conversation_repo
            .find_between(ConversationType::Direct, user_a, user_b)
            .await?
        {
            return Ok(conversation);
        }

        let conversation = conversation_repo
            .create(ConversationType::Direct, None, &[user_a, user_b])
            .await?;
        tracing::debug!(
            "Created direct conversation {} between users {} and {}",
            conversation.id,
            user_a,
            user_b
        );

        Ok(conversation)
    }

    /// Opens a direct conversation and optionally posts a first message.
    ///
    /// The first message goes through the full message rule set before anything is stored.
    pub async fn start_conversation(
        &self,
        sender_id: i32,
        recipient_id: i32,
        content: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(Conversation, Option<Message>), AppError> {
        let content = match content.filter(|c| !c.trim().is_empty()) {
            Some(content) => Some(
                RuleEngine::new(self.db)
                    .validate_message_sending(sender_id, recipient_id, content, now)
                    .await?,
            ),
            None => None,
        };

        let conversation = self
            .get_or_create_direct_conversation(sender_id, recipient_id)
            .await?;
        let message = self
            .post_opening_message(conversation.id, sender_id, content)
            .await?;

        Ok((conversation, message))
    }

    /// Opens or reuses a player's support conversation with a court owner and optionally
    /// posts a first message.
    ///
    /// # Returns
    /// - `Ok((Conversation, Option<Message>))` - Support conversation and the first message
    /// - `Err(RuleViolation::SupportForPlayersOnly)` - `player` is not a player
    /// - `Err(RuleViolation::SupportNeedsOwner)` - Recipient is not an active court owner
    /// - `Err(RuleViolation)` - The first message fails validation
    pub async fn open_support(
        &self,
        player: &User,
        owner_user_id: i32,
        content: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(Conversation, Option<Message>), AppError> {
        if player.role != Role::Player {
            return Err(RuleViolation::SupportForPlayersOnly.into());
        }

        let owner = UserRepository::new(self.db).find_by_id(owner_user_id).await?;
        if !owner.is_some_and(|u| u.is_active && u.role == Role::Owner) {
            return Err(RuleViolation::SupportNeedsOwner.into());
        }

        let content = match content.filter(|c| !c.trim().is_empty()) {
            Some(content) => Some(
                RuleEngine::new(self.db)
                    .validate_message_sending(player.id, owner_user_id, content, now)
                    .await?,
            ),
            None => None,
        };

        let conversation_repo = ConversationRepository::new(self.db);
        let conversation = match conversation_repo
            .find_between(ConversationType::Support, player.id, owner_user_id)
            .await?
        {
            Some(conversation) => conversation,
            None => {
                let conversation = conversation_repo
                    .create(
                        ConversationType::Support,
                        Some(SUPPORT_TITLE.to_string()),
                        &[player.id, owner_user_id],
                    )
                    .await?;
                tracing::info!(
                    "Player user {} opened support conversation {} with owner {}",
                    player.id,
                    conversation.id,
                    owner_user_id
                );
                conversation
            }
        };

        let message = self
            .post_opening_message(conversation.id, player.id, content)
            .await?;

        Ok((conversation, message))
    }

    /// Active users a user can start a conversation with, by full name.
    pub async fn directory(
        &self,
        user_id: i32,
        role: Option<Role>,
        search: Option<&str>,
    ) -> Result<Vec<User>, AppError> {
        Ok(UserRepository::new(self.db)
            .get_messaging_directory(user_id, role, search, DIRECTORY_LIMIT)
            .await?)
    }

    async fn post_opening_message(
        &self,
        conversation_id: i32,
        sender_id: i32,
        content: Option<String>,
    ) -> Result<Option<Message>, AppError> {
        let Some(content) = content else {
            return Ok(None);
        };

        let message = MessageRepository::new(self.db)
            .create(CreateMessageParam {
                conversation_id,
                sender_id,
                content,
                message_type: MessageType::Text,
                reply_to_message_id: None,
                related_booking_id: None,
            })
            .await?;

        Ok(Some(message))
    }

    /// Posts a text message into a conversation.
    ///
    /// The sender must be an active participant; admins may post anywhere.
    ///
    /// # Returns
    /// - `Ok(Message)` - The stored message
    /// - `Err(AppError::NotFound)` - Conversation or reply target does not exist
    /// - `Err(RuleViolation)` - Not a participant, or the message fails validation
    pub async fn send_message(
        &self,
        sender: &User,
        conversation_id: i32,
        content: &str,
        reply_to_message_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Message, AppError> {
        self.require_access(sender, conversation_id).await?;

        let content = RuleEngine::new(self.db)
            .validate_conversation_message(sender.id, content, now)
            .await?;

        let message_repo = MessageRepository::new(self.db);
        if let Some(reply_to) = reply_to_message_id {
            let target = message_repo.find_by_id(reply_to).await?;
            if !target.is_some_and(|m| m.conversation_id == conversation_id) {
                return Err(AppError::NotFound("Reply target not found".to_string()));
            }
        }

        let message = message_repo
            .create(CreateMessageParam {
                conversation_id,
                sender_id: sender.id,
                content,
                message_type: MessageType::Text,
                reply_to_message_id,
                related_booking_id: None,
            })
            .await?;

        Ok(message)
    }

    /// Posts a notification message from `sender_id` to `recipient_id`.
    ///
    /// Notifications skip the message rate limit and length rules since they are generated
    /// by the server.
    pub async fn post_notification(
        &self,
        sender_id: i32,
        recipient_id: i32,
        content: String,
        related_booking_id: Option<i32>,
    ) -> Result<Message, AppError> {
        let conversation = self
            .get_or_create_direct_conversation(sender_id, recipient_id)
            .await?;

        let message = MessageRepository::new(self.db)
            .create(CreateMessageParam {
                conversation_id: conversation.id,
                sender_id,
                content,
                message_type: MessageType::Notification,
                reply_to_message_id: None,
                related_booking_id,
            })
            .await?;

        Ok(message)
    }

    /// Reads messages from a conversation.
    ///
    /// With `since_id` returns every message newer than it, oldest first, for polling.
    /// Otherwise returns page `page` (0 = newest) of the history, oldest first.
    pub async fn get_messages(
        &self,
        user: &User,
        conversation_id: i32,
        since_id: Option<i32>,
        page: Option<u64>,
    ) -> Result<Vec<Message>, AppError> {
        self.require_access(user, conversation_id).await?;

        let message_repo = MessageRepository::new(self.db);
        let messages = match since_id {
            Some(since_id) => message_repo.get_since(conversation_id, since_id).await?,
            None => {
                message_repo
                    .get_page(conversation_id, page.unwrap_or(0), MESSAGES_PER_PAGE)
                    .await?
            }
        };

        Ok(messages)
    }

    /// Marks every message from others in the conversation as read by `user`.
    ///
    /// Admins may mark any conversation they can read.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of messages newly marked read, 0 when already read
    /// - `Err(AppError::NotFound)` - Conversation does not exist
    /// - `Err(RuleViolation::NotParticipant)` - User is not in the conversation
    pub async fn mark_conversation_read(
        &self,
        user: &User,
        conversation_id: i32,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        self.require_access(user, conversation_id).await?;

        let marked = MessageRepository::new(self.db)
            .mark_conversation_read(conversation_id, user.id, now)
            .await?;

        Ok(marked)
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64, AppError> {
        Ok(MessageRepository::new(self.db).count_unread(user_id).await?)
    }

    /// Lists conversations with participants, last message and unread count.
    ///
    /// Most recently updated first. Admins see every conversation.
    pub async fn list_conversations(&self, user: &User) -> Result<Vec<ConversationSummary>, AppError> {
        let conversation_repo = ConversationRepository::new(self.db);
        let message_repo = MessageRepository::new(self.db);

        let conversations = if user.role == Role::Admin {
            conversation_repo.get_all().await?
        } else {
            conversation_repo.get_for_user(user.id).await?
        };

        let ids: Vec<i32> = conversations.iter().map(|c| c.id).collect();
        let mut participants = conversation_repo.get_participants(&ids).await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let last_message = message_repo.get_last(conversation.id).await?;
            let unread_count = message_repo
                .count_unread_in(conversation.id, user.id)
                .await?;

            summaries.push(ConversationSummary {
                participants: participants.remove(&conversation.id).unwrap_or_default(),
                conversation,
                last_message,
                unread_count,
            });
        }

        Ok(summaries)
    }

    async fn require_access(&self, user: &User, conversation_id: i32) -> Result<(), AppError> {
        let conversation_repo = ConversationRepository::new(self.db);

        if conversation_repo.find_by_id(conversation_id).await?.is_none() {
            return Err(AppError::NotFound("Conversation not found".to_string()));
        }
        if user.role != Role::Admin
            && !conversation_repo
                .is_participant(conversation_id, user.id)
                .await?
        {
            return Err(RuleViolation::NotParticipant.into());
        }

        Ok(())
    }
}
