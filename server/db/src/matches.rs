use sea_orm::entity::prelude::*;

use crate::common::{DeltaSlots, OutcomeSlots, PlayerSlots, StatSlots};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub time_started: TimeDateTimeWithTimeZone,
    #[sea_orm(indexed)]
    pub time_ended: Option<TimeDateTimeWithTimeZone>,
    /// Elapsed simulated duration in milliseconds.
    pub gametime: i64,
    #[sea_orm(indexed)]
    pub map_name: String,
    pub map_hash: String,
    pub base_level: i32,
    pub power_level: i32,
    pub alliance_type: i32,
    pub scavengers: bool,
    // Per-seat columns; all index-aligned, length NUM_SLOTS.
    pub players: PlayerSlots,
    pub teams: StatSlots,
    pub colours: StatSlots,
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
    pub outcomes: OutcomeSlots,
    pub rating_diff: DeltaSlots,
    /// Research-completed events, stored verbatim as submitted.
    pub research_log: Option<Json>,
    pub finished: bool,
    pub calculated: bool,
    pub hidden: bool,
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::frames::Entity")]
    Frames,
    #[sea_orm(has_many = "super::match_players::Entity")]
    MatchPlayers,
}

impl Related<super::frames::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frames.def()
    }
}

impl Related<super::match_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayers.def()
    }
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        super::match_players::Relation::Players.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::match_players::Relation::Matches.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
