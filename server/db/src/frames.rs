use sea_orm::entity::prelude::*;

use crate::common::StatSlots;

/// A periodic telemetry snapshot taken during play. Append-only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "frames")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub match_id: i64,
    pub gametime: i64,
    pub kills: StatSlots,
    pub power: StatSlots,
    pub score: StatSlots,
    pub units: StatSlots,
    pub units_built: StatSlots,
    pub units_lost: StatSlots,
    pub structs: StatSlots,
    pub structs_built: StatSlots,
    pub structs_lost: StatSlots,
    pub research_count: StatSlots,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::matches::Entity",
        from = "Column::MatchId",
        to = "super::matches::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Matches,
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
