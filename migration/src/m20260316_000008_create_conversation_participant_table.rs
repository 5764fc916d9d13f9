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
                    .table(ConversationParticipant::Table)
                    .if_not_exists()
                    .col(pk_auto(ConversationParticipant::Id))
                    .col(integer(ConversationParticipant::ConversationId))
                    .col(integer(ConversationParticipant::UserId))
                    .col(string(ConversationParticipant::Role).default("participant"))
                    .col(
                        timestamp(ConversationParticipant::JoinedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_null(ConversationParticipant::LastReadAt))
                    .col(boolean(ConversationParticipant::IsActive).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversation_participant_conversation_id")
                            .from(
                                ConversationParticipant::Table,
                                ConversationParticipant::ConversationId,
                            )
                            .to(Conversation::Table, Conversation::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversation_participant_user_id")
                            .from(ConversationParticipant::Table, ConversationParticipant::UserId)
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
                    .name("idx_conversation_participant_unique")
                    .table(ConversationParticipant::Table)
                    .col(ConversationParticipant::ConversationId)
                    .col(ConversationParticipant::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ConversationParticipant::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum ConversationParticipant {
    Table,
    Id,
    ConversationId,
    UserId,
    Role,
    JoinedAt,
    LastReadAt,
    IsActive,
}
