//! Rating updates for finalized matches.
//!
//! Pure computation: no I/O, no shared state. Given the classified seats
//! of one match and each participant's prior rating state, produces the
//! updated states and a per-seat delta array. Deltas are written by seat
//! index, never by enumeration order, so a seat filtered out mid-sequence
//! can never shift the deltas of the seats after it.
//!
//! The formula is team-average Elo on both tracks. Expected score is
//! computed against the mean rating of the opposing side, the K factor
//! shrinks as a player accumulates rated matches, and a match without
//! both winners and losers moves nobody.

use std::collections::HashMap;

use autohost_db::common::{DeltaSlots, Outcome, NUM_SLOTS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatingState {
    pub player_id: i64,
    pub elo: i32,
    pub elo2: i32,
    pub autoplayed: i32,
    pub autowon: i32,
    pub autolost: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct RatedSlot {
    /// Seat index, 0..NUM_SLOTS.
    pub slot: usize,
    pub player_id: i64,
    pub outcome: Outcome,
}

fn k_factor(autoplayed: i32) -> f64 {
    if autoplayed < 5 {
        40.0
    } else if autoplayed < 30 {
        30.0
    } else {
        20.0
    }
}

fn expected(own: f64, opposing_mean: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opposing_mean - own) / 400.0))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Applies one match to the given rating states.
///
/// Every participant's `autoplayed` is incremented; `autowon`/`autolost`
/// follow the outcome classification; fighters touch neither counter and
/// receive a zero delta. The returned array carries `Some` exactly for the
/// seats present in `slots`.
pub fn rate_match(slots: &[RatedSlot], states: &mut HashMap<i64, RatingState>) -> DeltaSlots {
    let mut deltas = DeltaSlots::default();
    // Snapshot the prior ratings first so the order in which states are
    // mutated cannot influence the result.
    let winner_elo: Vec<f64> = side_ratings(slots, states, Outcome::Winner, |s| s.elo);
    let loser_elo: Vec<f64> = side_ratings(slots, states, Outcome::Loser, |s| s.elo);
    let winner_elo2: Vec<f64> = side_ratings(slots, states, Outcome::Winner, |s| s.elo2);
    let loser_elo2: Vec<f64> = side_ratings(slots, states, Outcome::Loser, |s| s.elo2);
    let decided = !winner_elo.is_empty() && !loser_elo.is_empty();

    for rs in slots {
        debug_assert!(rs.slot < NUM_SLOTS);
        let Some(st) = states.get_mut(&rs.player_id) else {
            continue;
        };
        let k = k_factor(st.autoplayed);
        st.autoplayed += 1;
        let (d, d2) = match rs.outcome {
            Outcome::Winner => {
                st.autowon += 1;
                if decided {
                    (
                        (k * (1.0 - expected(st.elo as f64, mean(&loser_elo)))).round() as i32,
                        (k * (1.0 - expected(st.elo2 as f64, mean(&loser_elo2)))).round() as i32,
                    )
                } else {
                    (0, 0)
                }
            }
            Outcome::Loser => {
                st.autolost += 1;
                if decided {
                    (
                        -(k * expected(st.elo as f64, mean(&winner_elo))).round() as i32,
                        -(k * expected(st.elo2 as f64, mean(&winner_elo2))).round() as i32,
                    )
                } else {
                    (0, 0)
                }
            }
            Outcome::Fighter => (0, 0),
        };
        st.elo += d;
        st.elo2 += d2;
        deltas.0[rs.slot] = Some(d);
    }
    deltas
}

fn side_ratings(
    slots: &[RatedSlot],
    states: &HashMap<i64, RatingState>,
    side: Outcome,
    track: impl Fn(&RatingState) -> i32,
) -> Vec<f64> {
    slots
        .iter()
        .filter(|rs| rs.outcome == side)
        .filter_map(|rs| states.get(&rs.player_id))
        .map(|s| track(s) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(player_id: i64, elo: i32, autoplayed: i32) -> RatingState {
        RatingState {
            player_id,
            elo,
            elo2: elo,
            autoplayed,
            autowon: 0,
            autolost: 0,
        }
    }

    fn duel(winner_elo: i32, loser_elo: i32) -> (HashMap<i64, RatingState>, DeltaSlots) {
        let mut states = HashMap::from([
            (1, state(1, winner_elo, 100)),
            (2, state(2, loser_elo, 100)),
        ]);
        let slots = [
            RatedSlot {
                slot: 0,
                player_id: 1,
                outcome: Outcome::Winner,
            },
            RatedSlot {
                slot: 1,
                player_id: 2,
                outcome: Outcome::Loser,
            },
        ];
        let deltas = rate_match(&slots, &mut states);
        (states, deltas)
    }

    #[test]
    fn winner_gains_and_loser_loses() {
        let (states, deltas) = duel(1400, 1400);
        assert!(deltas.0[0].unwrap() > 0);
        assert!(deltas.0[1].unwrap() < 0);
        assert!(states[&1].elo > 1400);
        assert!(states[&2].elo < 1400);
        // Equal ratings, equal K: the exchange is symmetric.
        assert_eq!(deltas.0[0].unwrap(), -deltas.0[1].unwrap());
    }

    #[test]
    fn upset_moves_more_points_than_expected_win() {
        let (_, expected_win) = duel(1600, 1200);
        let (_, upset) = duel(1200, 1600);
        assert!(upset.0[0].unwrap() > expected_win.0[0].unwrap());
    }

    #[test]
    fn counters_update_per_outcome() {
        let (states, _) = duel(1400, 1400);
        assert_eq!(states[&1].autoplayed, 101);
        assert_eq!(states[&1].autowon, 1);
        assert_eq!(states[&1].autolost, 0);
        assert_eq!(states[&2].autoplayed, 101);
        assert_eq!(states[&2].autowon, 0);
        assert_eq!(states[&2].autolost, 1);
    }

    #[test]
    fn fighters_get_zero_delta_and_no_win_loss_counters() {
        let mut states = HashMap::from([(1, state(1, 1400, 10)), (2, state(2, 1500, 10))]);
        let slots = [
            RatedSlot {
                slot: 0,
                player_id: 1,
                outcome: Outcome::Fighter,
            },
            RatedSlot {
                slot: 1,
                player_id: 2,
                outcome: Outcome::Fighter,
            },
        ];
        let deltas = rate_match(&slots, &mut states);
        assert_eq!(deltas.0[0], Some(0));
        assert_eq!(deltas.0[1], Some(0));
        assert_eq!(states[&1].elo, 1400);
        assert_eq!(states[&1].autoplayed, 11);
        assert_eq!(states[&1].autowon, 0);
        assert_eq!(states[&1].autolost, 0);
    }

    #[test]
    fn deltas_are_indexed_by_slot_not_enumeration_order() {
        // Seats 2 and 7 occupied; every other entry must stay None even
        // though the participants enumerate as a dense list.
        let mut states = HashMap::from([(1, state(1, 1400, 50)), (2, state(2, 1400, 50))]);
        let slots = [
            RatedSlot {
                slot: 7,
                player_id: 2,
                outcome: Outcome::Loser,
            },
            RatedSlot {
                slot: 2,
                player_id: 1,
                outcome: Outcome::Winner,
            },
        ];
        let deltas = rate_match(&slots, &mut states);
        for (i, d) in deltas.0.iter().enumerate() {
            match i {
                2 => assert!(d.unwrap() > 0),
                7 => assert!(d.unwrap() < 0),
                _ => assert_eq!(*d, None),
            }
        }
    }

    #[test]
    fn deterministic_given_identical_inputs() {
        let run = || {
            let mut states = HashMap::from([
                (1, state(1, 1380, 3)),
                (2, state(2, 1450, 40)),
                (3, state(3, 1290, 12)),
                (4, state(4, 1510, 7)),
            ]);
            let slots = [
                RatedSlot {
                    slot: 0,
                    player_id: 1,
                    outcome: Outcome::Winner,
                },
                RatedSlot {
                    slot: 1,
                    player_id: 2,
                    outcome: Outcome::Winner,
                },
                RatedSlot {
                    slot: 2,
                    player_id: 3,
                    outcome: Outcome::Loser,
                },
                RatedSlot {
                    slot: 3,
                    player_id: 4,
                    outcome: Outcome::Loser,
                },
            ];
            let deltas = rate_match(&slots, &mut states);
            (states, deltas)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn undecided_match_moves_no_ratings() {
        let mut states = HashMap::from([(1, state(1, 1400, 10)), (2, state(2, 1600, 10))]);
        let slots = [
            RatedSlot {
                slot: 0,
                player_id: 1,
                outcome: Outcome::Winner,
            },
            RatedSlot {
                slot: 1,
                player_id: 2,
                outcome: Outcome::Fighter,
            },
        ];
        // A winner without any loser: nothing to exchange against.
        let deltas = rate_match(&slots, &mut states);
        assert_eq!(deltas.0[0], Some(0));
        assert_eq!(states[&1].elo, 1400);
        assert_eq!(states[&1].autowon, 1);
    }
}
