use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260302_000001_create_user_table::User,
    m20260316_000007_create_conversation_table::Conversation,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Message::Table)
                    .if_not_exists()
                    .col(pk_auto(Message::Id))
                    .col(integer(Message::ConversationId))
                    .col(integer(Message::SenderId))
                    .col(text(Message::Content))
                    .col(string(Message::MessageType).default("text"))
                    .col(integer_null(Message::ReplyToMessageId))
                    .col(integer_null(Message::RelatedBookingId))
                    .col(boolean(Message::IsDeleted).default(false))
                    .col(
                        timestamp(Message::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_conversation_id")
                            .from(Message::Table, Message::ConversationId)
                            .to(Conversation::Table, Conversation::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_sender_id")
                            .from(Message::Table, Message::SenderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_message_conversation_id")
                    .table(Message::Table)
                    .col(Message::ConversationId)
                    .col(Message::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Message::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Message {
    Table,
    Id,
    ConversationId,
    SenderId,
    Content,
    MessageType,
    ReplyToMessageId,
    RelatedBookingId,
    IsDeleted,
    CreatedAt,
}
