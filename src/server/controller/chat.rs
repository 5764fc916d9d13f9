use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        chat::{
            ContactDto, ConversationDto, MarkReadDto, MessageDto, MessagesDto, SendMessageDto,
            StartConversationDto, StartSupportDto, StartedConversationDto, UnreadCountDto,
        },
    },
    server::{
        controller::param::{ContactParam, MessagesParam},
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            chat::{ConversationSummary, Message},
            user::User,
        },
        service::chat::ChatService,
        state::AppState,
    },
};

pub static CHAT_TAG: &str = "chat";

#[utoipa::path(
    get,
    path = "/api/chat/conversations",
    tag = CHAT_TAG,
    responses(
        (status = 200, description = "Conversations, most recently updated first", body = Vec<ConversationDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_conversations(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let conversations = ChatService::new(&state.db)
        .list_conversations(&user)
        .await?;

    let dto: Vec<ConversationDto> = conversations
        .into_iter()
        .map(ConversationSummary::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(dto)))
}

/// Opens or reuses the direct conversation with another user, optionally sending a first
/// message.
#[utoipa::path(
    post,
    path = "/api/chat/conversations",
    tag = CHAT_TAG,
    request_body = StartConversationDto,
    responses(
        (status = 201, description = "Conversation ready", body = StartedConversationDto),
        (status = 400, description = "Invalid recipient or message", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn start_conversation(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<StartConversationDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let (conversation, message) = ChatService::new(&state.db)
        .start_conversation(
            user.id,
            payload.recipient_user_id,
            payload.content.as_deref(),
            Utc::now(),
        )
        .await?;

    let dto = StartedConversationDto {
        conversation_id: conversation.id,
        message: message.map(Message::into_dto),
    };

    Ok((StatusCode::CREATED, Json(dto)))
}

/// Opens or reuses the current player's support conversation with a court owner.
#[utoipa::path(
    post,
    path = "/api/chat/support",
    tag = CHAT_TAG,
    request_body = StartSupportDto,
    responses(
        (status = 201, description = "Support conversation ready", body = StartedConversationDto),
        (status = 400, description = "Recipient is not an active court owner, or invalid message", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a player", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn start_support(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<StartSupportDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Player])
        .await?;

    let (conversation, message) = ChatService::new(&state.db)
        .open_support(
            &user,
            payload.owner_user_id,
            payload.content.as_deref(),
            Utc::now(),
        )
        .await?;

    let dto = StartedConversationDto {
        conversation_id: conversation.id,
        message: message.map(Message::into_dto),
    };

    Ok((StatusCode::CREATED, Json(dto)))
}

/// Active users the current user can message.
#[utoipa::path(
    get,
    path = "/api/chat/users",
    tag = CHAT_TAG,
    params(ContactParam),
    responses(
        (status = 200, description = "Up to 20 users ordered by name", body = Vec<ContactDto>),
        (status = 400, description = "Invalid role", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ContactParam>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let users = ChatService::new(&state.db)
        .directory(user.id, params.role()?, params.search())
        .await?;

    let dto: Vec<ContactDto> = users.into_iter().map(User::into_contact_dto).collect();

    Ok((StatusCode::OK, Json(dto)))
}

/// Polls for new messages with `since_id`, or pages back through history with `page`.
#[utoipa::path(
    get,
    path = "/api/chat/conversations/{id}/messages",
    tag = CHAT_TAG,
    params(
        ("id" = i32, Path, description = "Conversation ID"),
        MessagesParam
    ),
    responses(
        (status = 200, description = "Messages oldest first", body = MessagesDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a participant", body = ErrorDto),
        (status = 404, description = "Conversation not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_messages(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Query(params): Query<MessagesParam>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let messages = ChatService::new(&state.db)
        .get_messages(&user, id, params.since_id, params.page)
        .await?;

    let last_id = messages.iter().map(|m| m.id).max().or(params.since_id);
    let dto = MessagesDto {
        messages: messages.into_iter().map(Message::into_dto).collect(),
        last_id,
    };

    Ok((StatusCode::OK, Json(dto)))
}

#[utoipa::path(
    post,
    path = "/api/chat/conversations/{id}/messages",
    tag = CHAT_TAG,
    params(
        ("id" = i32, Path, description = "Conversation ID")
    ),
    request_body = SendMessageDto,
    responses(
        (status = 201, description = "Message sent", body = MessageDto),
        (status = 400, description = "Message rejected by the messaging rules", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a participant", body = ErrorDto),
        (status = 404, description = "Conversation not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<SendMessageDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let message = ChatService::new(&state.db)
        .send_message(
            &user,
            id,
            &payload.content,
            payload.reply_to_message_id,
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(message.into_dto())))
}

/// Marks every message from other participants in the conversation as read.
#[utoipa::path(
    post,
    path = "/api/chat/conversations/{id}/read",
    tag = CHAT_TAG,
    params(
        ("id" = i32, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Number of messages newly marked read", body = MarkReadDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not a participant", body = ErrorDto),
        (status = 404, description = "Conversation not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let marked = ChatService::new(&state.db)
        .mark_conversation_read(&user, id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(MarkReadDto { marked })))
}

#[utoipa::path(
    get,
    path = "/api/chat/unread",
    tag = CHAT_TAG,
    responses(
        (status = 200, description = "Unread messages across all conversations", body = UnreadCountDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let unread_count = ChatService::new(&state.db).unread_count(user.id).await?;

    Ok((StatusCode::OK, Json(UnreadCountDto { unread_count })))
}
