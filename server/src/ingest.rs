//! The three-phase match ingestion pipeline.
//!
//! A match moves through create -> frame* -> finalize. Create builds the
//! seat layout, upserts the participating players by identity hash and
//! inserts the match row, all in one transaction. Frames append immutable
//! telemetry snapshots. Finalize closes the match: it loads every
//! participant's rating state, runs the rating engine and persists the
//! match update together with all player rating updates in a single
//! transaction, guarded against double application by a conditional
//! update on the `finished` flag.

use std::collections::HashMap;

use sea_orm::prelude::TimeDateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set, TransactionError, TransactionTrait,
};
use sea_query::OnConflict;

use autohost_api::report::{
    CreateMatchRequest, FinalizeRequest, FrameRequest, MIN_PROTOCOL_VERSION,
};
use autohost_db as db;
use db::common::{Outcome, OutcomeSlots, PlayerSlots, StatSlots, EMPTY_PLAYER};

use crate::rating::{self, RatedSlot, RatingState};
use crate::slots;

#[derive(Debug)]
pub struct StorageError {
    pub context: String,
    pub source: DbErr,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, derive_more::Display)]
pub enum IngestError {
    #[display(fmt = "protocol version {_0} is below the supported minimum")]
    UnsupportedProtocol(u32),

    #[display(fmt = "start timestamp {_0} is not a valid time")]
    BadTimestamp(i64),

    #[display(fmt = "unrecognized outcome classification {_0:?}")]
    BadOutcome(String),

    #[display(fmt = "no match with id {_0}")]
    UnknownMatch(i64),

    #[display(fmt = "match {_0} is already finalized")]
    AlreadyFinalized(i64),

    #[display(fmt = "participant with hash {_0} has no player row")]
    MissingPlayer(String),

    #[display(fmt = "storage failure: {_0}")]
    Storage(StorageError),
}

impl std::error::Error for IngestError {}

fn storage(context: &'static str) -> impl FnOnce(DbErr) -> IngestError {
    move |source| {
        IngestError::Storage(StorageError {
            context: context.to_owned(),
            source,
        })
    }
}

fn flatten_txn(e: TransactionError<IngestError>) -> IngestError {
    match e {
        TransactionError::Connection(source) => IngestError::Storage(StorageError {
            context: "transaction".to_owned(),
            source,
        }),
        TransactionError::Transaction(e) => e,
    }
}

fn check_protocol(version: u32) -> Result<(), IngestError> {
    if version < MIN_PROTOCOL_VERSION {
        return Err(IngestError::UnsupportedProtocol(version));
    }
    Ok(())
}

async fn ensure_match_exists(db: &DatabaseConnection, match_id: i64) -> Result<(), IngestError> {
    db::matches::Entity::find_by_id(match_id)
        .one(db)
        .await
        .map_err(storage("look up match"))?
        .map(|_| ())
        .ok_or(IngestError::UnknownMatch(match_id))
}

async fn upsert_player<C: ConnectionTrait>(
    db: &C,
    name: &str,
    hash: &str,
) -> Result<i64, IngestError> {
    let player = db::players::ActiveModel {
        name: Set(name.to_owned()),
        hash: Set(hash.to_owned()),
        elo: Set(db::players::INITIAL_ELO),
        elo2: Set(db::players::INITIAL_ELO),
        autoplayed: Set(0),
        autowon: Set(0),
        autolost: Set(0),
        user_id: Set(None),
        ..Default::default()
    };
    // The hash is the durable identity; a conflict means the player is
    // already known and only the display name follows the report.
    db::players::Entity::insert(player)
        .on_conflict(
            OnConflict::column(db::players::Column::Hash)
                .update_column(db::players::Column::Name)
                .to_owned(),
        )
        .exec(db)
        .await
        .map_err(storage("upsert player"))?;
    let row = db::players::Entity::find()
        .filter(db::players::Column::Hash.eq(hash))
        .one(db)
        .await
        .map_err(storage("fetch upserted player"))?;
    row.map(|r| r.id).ok_or_else(|| {
        IngestError::Storage(StorageError {
            context: "upserted player row is missing".to_owned(),
            source: DbErr::RecordNotFound(hash.to_owned()),
        })
    })
}

/// Phase 1: registers a new match and returns its id.
pub async fn create_match(
    db: &DatabaseConnection,
    req: &CreateMatchRequest,
) -> Result<i64, IngestError> {
    check_protocol(req.protocol_version)?;
    let started =
        TimeDateTimeWithTimeZone::from_unix_timestamp_nanos(req.start_time_ms as i128 * 1_000_000)
            .map_err(|_| IngestError::BadTimestamp(req.start_time_ms))?;
    let assigned: Vec<_> = slots::assign(&req.players)
        .into_iter()
        .cloned()
        .collect();
    let game = req.game.clone();
    let gametime = req.gametime;

    db.transaction::<_, i64, IngestError>(move |txn| {
        Box::pin(async move {
            let mut seats = PlayerSlots::default();
            let mut teams = StatSlots::default();
            let mut colours = StatSlots::default();
            for p in &assigned {
                let player_id = upsert_player(txn, &p.name, &p.hash).await?;
                let i = p.position as usize;
                seats.0[i] = player_id;
                teams.0[i] = p.team;
                colours.0[i] = p.colour;
            }
            let m = db::matches::ActiveModel {
                time_started: Set(started),
                time_ended: Set(None),
                gametime: Set(gametime),
                map_name: Set(game.map_name),
                map_hash: Set(game.map_hash),
                base_level: Set(game.base_level),
                power_level: Set(game.power_level),
                alliance_type: Set(game.alliance_type),
                scavengers: Set(game.scavengers),
                players: Set(seats.clone()),
                teams: Set(teams),
                colours: Set(colours),
                kills: Set(StatSlots::default()),
                power: Set(StatSlots::default()),
                score: Set(StatSlots::default()),
                units: Set(StatSlots::default()),
                units_built: Set(StatSlots::default()),
                units_lost: Set(StatSlots::default()),
                structs: Set(StatSlots::default()),
                structs_built: Set(StatSlots::default()),
                structs_lost: Set(StatSlots::default()),
                research_count: Set(StatSlots::default()),
                outcomes: Set(OutcomeSlots::default()),
                rating_diff: Set(db::common::DeltaSlots::default()),
                research_log: Set(None),
                finished: Set(false),
                calculated: Set(false),
                hidden: Set(false),
                deleted: Set(false),
                ..Default::default()
            };
            let match_id = db::matches::Entity::insert(m)
                .exec(txn)
                .await
                .map_err(storage("insert match"))?
                .last_insert_id;
            let seat_rows: Vec<_> = seats
                .0
                .iter()
                .enumerate()
                .filter(|(_, pid)| **pid != EMPTY_PLAYER)
                .map(|(slot, pid)| db::match_players::ActiveModel {
                    match_id: Set(match_id),
                    slot: Set(slot as i32),
                    player_id: Set(*pid),
                })
                .collect();
            if !seat_rows.is_empty() {
                db::match_players::Entity::insert_many(seat_rows)
                    .exec(txn)
                    .await
                    .map_err(storage("insert match seats"))?;
            }
            Ok(match_id)
        })
    })
    .await
    .map_err(flatten_txn)
}

/// Phase 2: appends one telemetry frame to an existing match.
pub async fn append_frame(
    db: &DatabaseConnection,
    match_id: i64,
    req: &FrameRequest,
) -> Result<(), IngestError> {
    check_protocol(req.protocol_version)?;
    ensure_match_exists(db, match_id).await?;
    let assigned = slots::assign(&req.players);
    let st = slots::stats(&assigned);
    let frame = db::frames::ActiveModel {
        match_id: Set(match_id),
        gametime: Set(req.gametime),
        kills: Set(st.kills),
        power: Set(st.power),
        score: Set(st.score),
        units: Set(st.units),
        units_built: Set(st.units_built),
        units_lost: Set(st.units_lost),
        structs: Set(st.structs),
        structs_built: Set(st.structs_built),
        structs_lost: Set(st.structs_lost),
        research_count: Set(st.research_count),
        ..Default::default()
    };
    db::frames::Entity::insert(frame)
        .exec(db)
        .await
        .map_err(storage("insert frame"))?;
    Ok(())
}

/// Phase 3: closes a match and applies rating updates.
///
/// The match row update and every player rating update commit or roll
/// back together. A second finalize of the same match finds `finished`
/// already set and is rejected before any rating is touched again.
pub async fn finalize_match(
    db: &DatabaseConnection,
    match_id: i64,
    req: &FinalizeRequest,
) -> Result<(), IngestError> {
    check_protocol(req.protocol_version)?;
    ensure_match_exists(db, match_id).await?;
    let assigned = slots::assign(&req.players);
    let st = slots::stats(&assigned);

    let mut outcomes = OutcomeSlots::default();
    for p in &assigned {
        let outcome = match &p.outcome {
            Some(s) => Outcome::from_wire(s).ok_or_else(|| IngestError::BadOutcome(s.clone()))?,
            None => Outcome::Fighter,
        };
        outcomes.0[p.position as usize] = Some(outcome);
    }

    let mut states = HashMap::new();
    let mut rated = Vec::with_capacity(assigned.len());
    for p in &assigned {
        let row = db::players::Entity::find()
            .filter(db::players::Column::Hash.eq(p.hash.as_str()))
            .one(db)
            .await
            .map_err(storage("load rating state"))?;
        let Some(row) = row else {
            // Phase 1 upserts every participant, so this is an upstream
            // bug, not bad input.
            log::error!(
                "Finalize of match {match_id}: participant {:?} ({}) has no player row",
                p.name,
                p.hash
            );
            return Err(IngestError::MissingPlayer(p.hash.clone()));
        };
        rated.push(RatedSlot {
            slot: p.position as usize,
            player_id: row.id,
            outcome: outcomes.0[p.position as usize].unwrap_or(Outcome::Fighter),
        });
        states.insert(
            row.id,
            RatingState {
                player_id: row.id,
                elo: row.elo,
                elo2: row.elo2,
                autoplayed: row.autoplayed,
                autowon: row.autowon,
                autolost: row.autolost,
            },
        );
    }
    let deltas = rating::rate_match(&rated, &mut states);
    let research_log = serde_json::Value::Array(req.research.clone());
    let gametime = req.gametime;

    db.transaction::<_, (), IngestError>(move |txn| {
        Box::pin(async move {
            let update = db::matches::ActiveModel {
                time_ended: Set(Some(TimeDateTimeWithTimeZone::now_utc())),
                gametime: Set(gametime),
                kills: Set(st.kills),
                power: Set(st.power),
                score: Set(st.score),
                units: Set(st.units),
                units_built: Set(st.units_built),
                units_lost: Set(st.units_lost),
                structs: Set(st.structs),
                structs_built: Set(st.structs_built),
                structs_lost: Set(st.structs_lost),
                research_count: Set(st.research_count),
                outcomes: Set(outcomes),
                rating_diff: Set(deltas),
                research_log: Set(Some(research_log)),
                finished: Set(true),
                calculated: Set(true),
                ..Default::default()
            };
            // The finished flag doubles as the finalize-once guard.
            let res = db::matches::Entity::update_many()
                .set(update)
                .filter(
                    Condition::all()
                        .add(db::matches::Column::Id.eq(match_id))
                        .add(db::matches::Column::Finished.eq(false)),
                )
                .exec(txn)
                .await
                .map_err(storage("finalize match row"))?;
            if res.rows_affected != 1 {
                return Err(IngestError::AlreadyFinalized(match_id));
            }
            for s in states.values() {
                log::info!(
                    "Updating player {}: elo {} elo2 {} autoplayed {} autowon {} autolost {}",
                    s.player_id,
                    s.elo,
                    s.elo2,
                    s.autoplayed,
                    s.autowon,
                    s.autolost
                );
                let res = db::players::Entity::update_many()
                    .set(db::players::ActiveModel {
                        elo: Set(s.elo),
                        elo2: Set(s.elo2),
                        autoplayed: Set(s.autoplayed),
                        autowon: Set(s.autowon),
                        autolost: Set(s.autolost),
                        ..Default::default()
                    })
                    .filter(db::players::Column::Id.eq(s.player_id))
                    .exec(txn)
                    .await
                    .map_err(storage("update player rating"))?;
                if res.rows_affected != 1 {
                    return Err(IngestError::Storage(StorageError {
                        context: format!(
                            "rating update for player {} affected {} rows",
                            s.player_id, res.rows_affected
                        ),
                        source: DbErr::Custom("row count mismatch".to_owned()),
                    }));
                }
            }
            Ok(())
        })
    })
    .await
    .map_err(flatten_txn)
}
