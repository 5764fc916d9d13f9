use sea_orm_migration::{prelude::*, schema::*};

use super::m20260302_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Owner::Table)
                    .if_not_exists()
                    .col(pk_auto(Owner::Id))
                    .col(integer_uniq(Owner::UserId))
                    .col(string_null(Owner::BusinessName))
                    .col(
                        timestamp(Owner::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_owner_user_id")
                            .from(Owner::Table, Owner::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Owner::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Owner {
    Table,
    Id,
    UserId,
    BusinessName,
    CreatedAt,
}
