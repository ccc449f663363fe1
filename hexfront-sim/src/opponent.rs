//! Seeded random opponent
//!
//! Only reads the game through `Rules` and `MovementPlanner`; the choice
//! itself comes from an explicit ChaCha8 generator, so the same seed and the
//! same state always produce the same action.

use hexfront_core::{GameState, Hex, MovementPlanner, Rules};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RandomOpponent {
    rng: ChaCha8Rng,
}

impl RandomOpponent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Every legal (from, to) pair for the current player, in a fixed order.
    ///
    /// Returns (attacks, moves); an attack is any action aimed at an
    /// occupied tile, including move-then-attack.
    pub fn candidate_actions(state: &GameState) -> (Vec<(Hex, Hex)>, Vec<(Hex, Hex)>) {
        let rules = Rules::new(state);
        let planner = MovementPlanner::new(state);
        let player = state.current_player();
        let enemies: Vec<Hex> = state
            .unit_positions()
            .into_iter()
            .filter(|&h| state.get_unit_at(h).is_some_and(|u| u.owner != player))
            .collect();

        let mut attacks = Vec::new();
        let mut moves = Vec::new();

        for from in state.positions_of(player) {
            let mut targets: Vec<Hex> = planner.reachable_hexes(from).into_iter().collect();
            targets.sort_unstable();

            for &enemy in &enemies {
                if rules.is_valid_attack(from, enemy) && !targets.contains(&enemy) {
                    targets.push(enemy);
                }
            }

            for to in targets {
                if !rules.can_do_action(from, to) {
                    continue;
                }
                if state.is_occupied(to) {
                    attacks.push((from, to));
                } else {
                    moves.push((from, to));
                }
            }
        }

        (attacks, moves)
    }

    /// Pick an action, preferring attacks. None when nothing is legal.
    pub fn choose_action(&mut self, state: &GameState) -> Option<(Hex, Hex)> {
        let (attacks, moves) = Self::candidate_actions(state);
        let pool = if attacks.is_empty() { moves } else { attacks };
        pool.choose(&mut self.rng).copied()
    }
}
