//! Trip records.
//!
//! `month` and `payout` are denormalized: both are derived from the other
//! fields when the row is written and are never recomputed on read.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub date: Date,
    pub vehicle: String,
    pub stops: f64,
    pub km: f64,
    pub loaded_pallets: f64,
    pub empty_crates: f64,
    pub returned_pallets: f64,
    pub weekend: bool,
    /// Month scope, `YYYY-MM`.
    pub month: String,
    pub payout: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
