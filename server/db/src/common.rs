use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Number of player seats in a match. Every per-slot column on `matches`
/// and `frames` has exactly this length, index-aligned across columns.
pub const NUM_SLOTS: usize = 11;

/// Marks an unoccupied seat in a player-id slot column.
pub const EMPTY_PLAYER: i64 = -1;

/// Marks an unoccupied seat in a stat slot column.
pub const EMPTY_STAT: i32 = -1;

/// Outcome classification assigned to an occupied seat at finalize time.
/// `Fighter` means the match ended without a decision for that seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Winner,
    Loser,
    Fighter,
}

impl Outcome {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "winner" => Some(Outcome::Winner),
            "loser" => Some(Outcome::Loser),
            "fighter" => Some(Outcome::Fighter),
            _ => None,
        }
    }
}

/// Per-seat player ids, stored as a JSON column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PlayerSlots(pub [i64; NUM_SLOTS]);

impl Default for PlayerSlots {
    fn default() -> Self {
        Self([EMPTY_PLAYER; NUM_SLOTS])
    }
}

/// Per-seat integer values (teams, colours, stat counters), stored as a
/// JSON column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StatSlots(pub [i32; NUM_SLOTS]);

impl Default for StatSlots {
    fn default() -> Self {
        Self([EMPTY_STAT; NUM_SLOTS])
    }
}

/// Per-seat outcome classifications; `None` for unoccupied seats.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct OutcomeSlots(pub [Option<Outcome>; NUM_SLOTS]);

/// Per-seat rating deltas; `None` for seats that took no part in the
/// rating computation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct DeltaSlots(pub [Option<i32>; NUM_SLOTS]);
