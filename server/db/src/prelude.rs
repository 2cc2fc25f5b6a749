pub use super::frames::Entity as Frames;
pub use super::match_players::Entity as MatchPlayers;
pub use super::matches::Entity as Matches;
pub use super::players::Entity as Players;
