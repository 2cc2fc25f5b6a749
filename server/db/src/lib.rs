pub mod prelude;

pub mod common;
pub mod frames;
pub mod match_players;
pub mod matches;
pub mod players;
