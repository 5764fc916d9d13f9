use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shared_booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Player profile ID of the proposing player.
    pub player1_id: i32,
    /// Player profile ID of the invited partner.
    pub player2_id: i32,
    pub court_id: i32,
    pub booking_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub status: String,
    pub total_cost: f64,
    pub player1_share: f64,
    pub player2_share: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub initiator_notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub partner_notes: Option<String>,
    pub alternative_court_id: Option<i32>,
    pub alternative_date: Option<Date>,
    pub alternative_start_time: Option<Time>,
    pub alternative_end_time: Option<Time>,
    #[sea_orm(column_type = "Text", nullable)]
    pub alternative_notes: Option<String>,
    pub final_booking_id: Option<i32>,
    pub proposed_at: DateTimeUtc,
    pub responded_at: Option<DateTimeUtc>,
    pub confirmed_at: Option<DateTimeUtc>,
    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::court::Entity",
        from = "Column::CourtId",
        to = "super::court::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Court,
}

impl Related<super::court::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Court.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
