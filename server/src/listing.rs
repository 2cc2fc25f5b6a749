//! Match listing and summarization.
//!
//! A listing request fans out into four independent queries run
//! concurrently: the unfiltered visible total, the filtered total, the
//! requested page of match rows, and the player rows referenced by that
//! page. The first failure cancels the rest. Player resolution joins in
//! memory; the relational `match_players` mirror keeps the player filter
//! and the page-players lookup out of the JSON slot columns.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use serde::Serialize;

use autohost_db as db;
use db::common::{Outcome, EMPTY_PLAYER, NUM_SLOTS};

pub const MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    Id,
    #[default]
    TimeStarted,
    Gametime,
    MapName,
}

impl SortField {
    /// Unknown field names fall back to the default rather than failing
    /// the request.
    pub fn parse(s: &str) -> Self {
        match s {
            "id" => SortField::Id,
            "time_started" => SortField::TimeStarted,
            "gametime" => SortField::Gametime,
            "map_name" => SortField::MapName,
            other => {
                log::warn!("Unknown sort field {other:?}, sorting by time_started");
                SortField::TimeStarted
            }
        }
    }

    fn column(self) -> db::matches::Column {
        match self {
            SortField::Id => db::matches::Column::Id,
            SortField::TimeStarted => db::matches::Column::TimeStarted,
            SortField::Gametime => db::matches::Column::Gametime,
            SortField::MapName => db::matches::Column::MapName,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        match s {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            other => {
                log::warn!("Unknown sort order {other:?}, sorting descending");
                SortOrder::Desc
            }
        }
    }

    fn order(self) -> Order {
        match self {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Who is asking. Hidden and deleted matches exist only for privileged
/// callers; everyone else gets a listing in which they never happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Privileged,
}

#[derive(Clone, Debug, Default)]
pub struct ListParams {
    pub limit: Option<u64>,
    pub offset: u64,
    pub sort: SortField,
    pub order: SortOrder,
    pub map: Option<String>,
    pub player: Option<i64>,
}

pub fn effective_limit(requested: Option<u64>) -> u64 {
    requested
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

#[derive(Serialize, Clone, Debug)]
pub struct PlayerBrief {
    pub id: i64,
    pub name: String,
    pub hash: String,
    pub elo: i32,
    pub elo2: i32,
    pub autoplayed: i32,
    pub autowon: i32,
    pub autolost: i32,
}

#[derive(Serialize, Clone, Debug)]
pub struct SlotView {
    pub slot: usize,
    /// `None` when the referenced player row could not be resolved.
    pub player: Option<PlayerBrief>,
    pub team: i32,
    pub colour: i32,
    pub outcome: Option<Outcome>,
    pub rating_diff: Option<i32>,
}

#[derive(Serialize, Clone, Debug)]
pub struct MatchSummary {
    pub id: i64,
    pub time_started: String,
    pub time_ended: Option<String>,
    pub gametime: i64,
    pub map_name: String,
    pub finished: bool,
    pub players: Vec<SlotView>,
}

#[derive(Serialize, Clone, Debug)]
pub struct ListedMatches {
    /// Visible matches regardless of filters.
    pub total: u64,
    /// Visible matches passing the map and player filters.
    pub total_filtered: u64,
    pub matches: Vec<MatchSummary>,
}

fn visibility(caller: Caller) -> Condition {
    match caller {
        Caller::Privileged => Condition::all(),
        Caller::Anonymous => Condition::all()
            .add(db::matches::Column::Hidden.eq(false))
            .add(db::matches::Column::Deleted.eq(false)),
    }
}

fn filter_condition(params: &ListParams, caller: Caller) -> Condition {
    let mut cond = visibility(caller);
    if let Some(map) = &params.map {
        cond = cond.add(db::matches::Column::MapName.eq(map.as_str()));
    }
    if let Some(player_id) = params.player {
        cond = cond.add(
            db::matches::Column::Id.in_subquery(
                db::match_players::Entity::find()
                    .select_only()
                    .column(db::match_players::Column::MatchId)
                    .filter(db::match_players::Column::PlayerId.eq(player_id))
                    .into_query(),
            ),
        );
    }
    cond
}

pub async fn list_matches(
    db: &DatabaseConnection,
    params: &ListParams,
    caller: Caller,
) -> Result<ListedMatches, DbErr> {
    let cond = filter_condition(params, caller);
    let page = db::matches::Entity::find()
        .filter(cond.clone())
        .order_by(params.sort.column(), params.order.order())
        .limit(effective_limit(params.limit))
        .offset(params.offset);
    // Resolve the page's players with a subquery over the page itself so
    // all four queries are independent of each other.
    let page_ids = page
        .clone()
        .select_only()
        .column(db::matches::Column::Id)
        .into_query();
    let page_players = db::players::Entity::find().filter(
        db::players::Column::Id.in_subquery(
            db::match_players::Entity::find()
                .select_only()
                .column(db::match_players::Column::PlayerId)
                .filter(db::match_players::Column::MatchId.in_subquery(page_ids))
                .into_query(),
        ),
    );

    let (total, total_filtered, rows, players) = tokio::try_join!(
        db::matches::Entity::find().filter(visibility(caller)).count(db),
        db::matches::Entity::find().filter(cond).count(db),
        page.all(db),
        page_players.all(db),
    )?;

    let players: HashMap<i64, db::players::Model> =
        players.into_iter().map(|p| (p.id, p)).collect();
    let matches = rows.iter().map(|m| summarize(m, &players)).collect();
    Ok(ListedMatches {
        total,
        total_filtered,
        matches,
    })
}

fn summarize(m: &db::matches::Model, players: &HashMap<i64, db::players::Model>) -> MatchSummary {
    let mut seats = Vec::new();
    for slot in 0..NUM_SLOTS {
        let player_id = m.players.0[slot];
        if player_id == EMPTY_PLAYER {
            continue;
        }
        let brief = players.get(&player_id).map(|p| PlayerBrief {
            id: p.id,
            name: p.name.clone(),
            hash: p.hash.clone(),
            elo: p.elo,
            elo2: p.elo2,
            autoplayed: p.autoplayed,
            autowon: p.autowon,
            autolost: p.autolost,
        });
        if brief.is_none() {
            log::warn!("Match {} seat {slot} references unknown player {player_id}", m.id);
        }
        seats.push(SlotView {
            slot,
            player: brief,
            team: m.teams.0[slot],
            colour: m.colours.0[slot],
            outcome: m.outcomes.0[slot],
            rating_diff: m.rating_diff.0[slot],
        });
    }
    MatchSummary {
        id: m.id,
        time_started: format_time(m.time_started),
        time_ended: m.time_ended.map(format_time),
        gametime: m.gametime,
        map_name: m.map_name.clone(),
        finished: m.finished,
        players: seats,
    }
}

pub fn format_time(time: time::OffsetDateTime) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    time.format(&format).unwrap_or_default()
}
