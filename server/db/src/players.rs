use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Durable identity; the display name may change, the hash never does.
    #[sea_orm(unique, indexed)]
    pub hash: String,
    pub elo: i32,
    pub elo2: i32,
    pub autoplayed: i32,
    pub autowon: i32,
    pub autolost: i32,
    /// Optional link to an externally managed account.
    pub user_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::match_players::Entity")]
    MatchPlayers,
}

impl Related<super::match_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayers.def()
    }
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        super::match_players::Relation::Matches.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::match_players::Relation::Players.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Rating a player starts out with on both tracks.
pub const INITIAL_ELO: i32 = 1400;
