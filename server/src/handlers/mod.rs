pub mod prelude;

pub mod get_leaderboard;
pub mod get_matches;
pub mod post_create_match;
pub mod post_finalize;
pub mod post_frame;
