//! Wire types for match reports submitted by the hosting client.
//!
//! A match is reported in three phases: a creation report when the lobby
//! launches, any number of telemetry frames while the game runs, and one
//! finalize report when it ends. All three carry the protocol version and
//! a participant list; positions index the fixed seat layout of a match.

use serde::{Deserialize, Serialize};

/// Reports below this protocol version are rejected in every phase.
pub const MIN_PROTOCOL_VERSION: u32 = 4;

/// One participant as reported by the hosting client.
///
/// `position` is the zero-based seat index. Stat fields default to zero so
/// that the creation report, which carries no gameplay stats yet, can omit
/// them. `outcome` is only meaningful in the finalize report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedPlayer {
    pub position: i32,
    pub name: String,
    pub hash: String,
    #[serde(default)]
    pub team: i32,
    #[serde(default)]
    pub colour: i32,
    #[serde(default)]
    pub kills: i32,
    #[serde(default)]
    pub power: i32,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub units: i32,
    #[serde(default)]
    pub units_built: i32,
    #[serde(default)]
    pub units_lost: i32,
    #[serde(default)]
    pub structs: i32,
    #[serde(default)]
    pub structs_built: i32,
    #[serde(default)]
    pub structs_lost: i32,
    #[serde(default)]
    pub research_count: i32,
    #[serde(default)]
    pub outcome: Option<String>,
}

/// Lobby settings captured once at creation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSetup {
    pub map_name: String,
    pub map_hash: String,
    #[serde(default)]
    pub base_level: i32,
    #[serde(default)]
    pub power_level: i32,
    #[serde(default)]
    pub alliance_type: i32,
    #[serde(default)]
    pub scavengers: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    pub protocol_version: u32,
    /// Wall-clock start time, milliseconds since the Unix epoch.
    pub start_time_ms: i64,
    /// In-game clock at report time; normally zero at creation.
    #[serde(default)]
    pub gametime: i64,
    pub game: GameSetup,
    pub players: Vec<ReportedPlayer>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRequest {
    pub protocol_version: u32,
    pub gametime: i64,
    pub players: Vec<ReportedPlayer>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalizeRequest {
    pub protocol_version: u32,
    pub gametime: i64,
    pub players: Vec<ReportedPlayer>,
    /// Research-completed events; stored verbatim, never interpreted here.
    #[serde(default)]
    pub research: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateMatchResponse {
    pub match_id: i64,
}
