use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260302_000001_create_user_table::User, m20260316_000009_create_message_table::Message,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MessageReadStatus::Table)
                    .if_not_exists()
                    .col(pk_auto(MessageReadStatus::Id))
                    .col(integer(MessageReadStatus::MessageId))
                    .col(integer(MessageReadStatus::UserId))
                    .col(
                        timestamp(MessageReadStatus::ReadAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_read_status_message_id")
                            .from(MessageReadStatus::Table, MessageReadStatus::MessageId)
                            .to(Message::Table, Message::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_read_status_user_id")
                            .from(MessageReadStatus::Table, MessageReadStatus::UserId)
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
                    .name("idx_message_read_status_unique")
                    .table(MessageReadStatus::Table)
                    .col(MessageReadStatus::MessageId)
                    .col(MessageReadStatus::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MessageReadStatus::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MessageReadStatus {
    Table,
    Id,
    MessageId,
    UserId,
    ReadAt,
}
