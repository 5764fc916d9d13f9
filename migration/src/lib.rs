pub use sea_orm_migration::prelude::*;

mod m20260302_000001_create_user_table;
mod m20260302_000002_create_player_table;
mod m20260302_000003_create_owner_table;
mod m20260302_000004_create_court_table;
mod m20260302_000005_create_booking_table;
mod m20260309_000006_create_shared_booking_table;
mod m20260316_000007_create_conversation_table;
mod m20260316_000008_create_conversation_participant_table;
mod m20260316_000009_create_message_table;
mod m20260316_000010_create_message_read_status_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260302_000001_create_user_table::Migration),
            Box::new(m20260302_000002_create_player_table::Migration),
            Box::new(m20260302_000003_create_owner_table::Migration),
            Box::new(m20260302_000004_create_court_table::Migration),
            Box::new(m20260302_000005_create_booking_table::Migration),
            Box::new(m20260309_000006_create_shared_booking_table::Migration),
            Box::new(m20260316_000007_create_conversation_table::Migration),
            Box::new(m20260316_000008_create_conversation_participant_table::Migration),
            Box::new(m20260316_000009_create_message_table::Migration),
            Box::new(m20260316_000010_create_message_read_status_table::Migration),
        ]
    }
}
