//! Seat assignment for submitted participant lists.
//!
//! Every match has a fixed layout of `NUM_SLOTS` seats. The hosting client
//! reports participants with a zero-based `position`; this module filters
//! out what must never reach storage (the hosting bot itself, participants
//! with no identity, out-of-range positions) and spreads the rest into
//! fixed-length index-aligned arrays with sentinels in the empty seats.

use autohost_api::report::ReportedPlayer;
use autohost_db::common::{StatSlots, NUM_SLOTS};

/// The hosting bot joins its own lobbies and shows up in every report.
/// It is a protocol artifact, not a player, and is dropped everywhere.
pub const HOST_NAME: &str = "Autohoster";
pub const HOST_HASH: &str = "a0c124533ddcaf5a19cc7d593c33d750680dc428b0021672e0b86a9b0dcfd711";

pub fn is_host(p: &ReportedPlayer) -> bool {
    p.name == HOST_NAME && p.hash == HOST_HASH
}

/// Filters the participant list down to the players that occupy a seat and
/// returns them sorted by ascending position (stable, so order of
/// appearance is preserved among equal positions).
pub fn assign(players: &[ReportedPlayer]) -> Vec<&ReportedPlayer> {
    let mut occupants: Vec<&ReportedPlayer> = players
        .iter()
        .filter(|p| {
            if is_host(p) {
                return false;
            }
            if p.name.is_empty() || p.hash.is_empty() {
                return false;
            }
            if !(0..NUM_SLOTS as i32).contains(&p.position) {
                log::warn!(
                    "Dropping participant {:?} with out-of-range position {}",
                    p.name,
                    p.position
                );
                return false;
            }
            true
        })
        .collect();
    occupants.sort_by_key(|p| p.position);
    occupants
}

/// Per-seat stat arrays built from an assigned participant list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotStats {
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

pub fn stats(assigned: &[&ReportedPlayer]) -> SlotStats {
    let mut out = SlotStats::default();
    for p in assigned {
        let i = p.position as usize;
        out.kills.0[i] = p.kills;
        out.power.0[i] = p.power;
        out.score.0[i] = p.score;
        out.units.0[i] = p.units;
        out.units_built.0[i] = p.units_built;
        out.units_lost.0[i] = p.units_lost;
        out.structs.0[i] = p.structs;
        out.structs_built.0[i] = p.structs_built;
        out.structs_lost.0[i] = p.structs_lost;
        out.research_count.0[i] = p.research_count;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use autohost_db::common::EMPTY_STAT;

    fn player(position: i32, name: &str) -> ReportedPlayer {
        ReportedPlayer {
            position,
            name: name.to_owned(),
            hash: format!("hash-of-{name}"),
            kills: 7,
            ..Default::default()
        }
    }

    #[test]
    fn host_is_dropped_wherever_it_appears() {
        for host_pos in [0, 1, 2] {
            let mut players = vec![player(0, "alice"), player(1, "bob")];
            let mut host = player(host_pos, HOST_NAME);
            host.hash = HOST_HASH.to_owned();
            players.insert(host_pos as usize, host);
            let assigned = assign(&players);
            assert_eq!(assigned.len(), 2);
            assert!(assigned.iter().all(|p| !is_host(p)));
        }
    }

    #[test]
    fn host_identity_matches_the_hosting_client() {
        // The hosting client reports itself under exactly this pair; a
        // drift here would let the bot into slot and rating data.
        let host = ReportedPlayer {
            position: 0,
            name: "Autohoster".to_owned(),
            hash: "a0c124533ddcaf5a19cc7d593c33d750680dc428b0021672e0b86a9b0dcfd711"
                .to_owned(),
            ..Default::default()
        };
        assert!(is_host(&host));
        assert!(assign(&[host, player(1, "alice")]).len() == 1);
    }

    #[test]
    fn anonymous_participants_are_dropped() {
        let mut nameless = player(2, "carol");
        nameless.name = String::new();
        let mut hashless = player(3, "dave");
        hashless.hash = String::new();
        let players = vec![player(0, "alice"), nameless, hashless];
        let assigned = assign(&players);
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].name, "alice");
    }

    #[test]
    fn out_of_range_position_does_not_shift_other_slots() {
        let players = vec![player(0, "alice"), player(4, "bob")];
        let with_stray = {
            let mut v = players.clone();
            v.insert(1, player(-1, "stray-low"));
            v.push(player(11, "stray-high"));
            v
        };
        let baseline = stats(&assign(&players));
        let with_strays = stats(&assign(&with_stray));
        assert_eq!(baseline, with_strays);
        assert_eq!(baseline.kills.0[0], 7);
        assert_eq!(baseline.kills.0[4], 7);
    }

    #[test]
    fn every_stat_array_has_sentinels_in_empty_seats() {
        let players = vec![player(3, "alice")];
        let st = stats(&assign(&players));
        for i in 0..NUM_SLOTS {
            if i == 3 {
                assert_eq!(st.kills.0[i], 7);
            } else {
                assert_eq!(st.kills.0[i], EMPTY_STAT);
                assert_eq!(st.score.0[i], EMPTY_STAT);
                assert_eq!(st.research_count.0[i], EMPTY_STAT);
            }
        }
    }

    #[test]
    fn assignment_is_sorted_by_position() {
        let players = vec![player(5, "e"), player(0, "a"), player(2, "c")];
        let assigned = assign(&players);
        let positions: Vec<i32> = assigned.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 2, 5]);
    }
}
