//! Movement planning over the wrapped board
//!
//! Two searches share the same neighbor expansion: a cost-bounded frontier
//! search for "where can this unit go this turn", and A* for "how do I get
//! there". Every candidate neighbor is canonicalized through `Board::wrap`
//! before it is looked at, so the seam is invisible to both.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::game::GameState;
use crate::hex::Hex;

/// A planned action: the full path (start included) and its terrain cost
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPath {
    pub from: Hex,
    pub to: Hex,
    pub path: Vec<Hex>,
    /// Sum of terrain costs of every step after the start
    pub cost: u32,
}

/// Read-only planner over a game state
pub struct MovementPlanner<'a> {
    state: &'a GameState,
}

impl<'a> MovementPlanner<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    // ========================================================================
    // REACHABILITY
    // ========================================================================

    /// Every hex the unit at `from` can move into or attack this turn, with
    /// the accumulated terrain cost of getting there.
    ///
    /// Enemy-occupied tiles are included as targets but never expanded. For
    /// units with attack range 0 they are left out entirely. The origin is
    /// never included. Empty if there is no unit at `from`.
    pub fn reachable_costs(&self, from: Hex) -> FxHashMap<Hex, u32> {
        let board = self.state.board();
        let mut best: FxHashMap<Hex, u32> = FxHashMap::default();

        let Some(unit) = self.state.get_unit_at(from) else {
            return best;
        };
        let from = board.wrap(from);
        let budget = unit.movement();

        let mut frontier = BinaryHeap::new();
        best.insert(from, 0);
        frontier.push(Reverse((0u32, from)));
        let mut expanded = 0usize;

        while let Some(Reverse((cost, pos))) = frontier.pop() {
            // Stale entry: a cheaper route was found after this was queued
            if cost > best.get(&pos).copied().unwrap_or(u32::MAX) {
                continue;
            }
            expanded += 1;

            for next in board.neighbors(pos) {
                if next == from {
                    continue;
                }
                let Some(step) = board.move_cost(next) else {
                    continue;
                };
                let total = cost + step;
                if total > budget {
                    continue;
                }
                if best.get(&next).is_some_and(|&known| known <= total) {
                    continue;
                }

                match self.state.get_unit_at(next) {
                    Some(occupant) if occupant.owner == unit.owner => {}
                    Some(_) => {
                        if unit.attack_range() > 0 {
                            best.insert(next, total);
                        }
                    }
                    None => {
                        best.insert(next, total);
                        frontier.push(Reverse((total, next)));
                    }
                }
            }
        }

        best.remove(&from);
        tracing::trace!(
            "Reachability from {:?}: {} hexes, {} expanded",
            from,
            best.len(),
            expanded
        );
        best
    }

    pub fn reachable_hexes(&self, from: Hex) -> FxHashSet<Hex> {
        self.reachable_costs(from).into_keys().collect()
    }

    /// Strict, terrain-aware, this-turn check (contrast `Rules::is_valid_move`)
    pub fn can_reach_this_turn(&self, from: Hex, to: Hex) -> bool {
        let to = self.state.board().wrap(to);
        self.reachable_costs(from).contains_key(&to)
    }

    // ========================================================================
    // PATHFINDING
    // ========================================================================

    /// A* from `start` to `end`, path includes both endpoints.
    ///
    /// Impassable tiles are never entered. Occupied tiles are blocked unless
    /// they are the destination. Returns None if `end` cannot be reached.
    pub fn find_path(&self, start: Hex, end: Hex) -> Option<Vec<Hex>> {
        let board = self.state.board();
        if !board.contains(start) || !board.contains(end) {
            return None;
        }
        let start = board.wrap(start);
        let end = board.wrap(end);

        if start == end {
            return Some(vec![start]);
        }
        if !board.is_passable(end) {
            return None;
        }
        if board.distance(start, end) == 1 {
            return Some(vec![start, end]);
        }

        let mut open = BinaryHeap::new();
        let mut came_from: FxHashMap<Hex, Hex> = FxHashMap::default();
        let mut g_score: FxHashMap<Hex, u32> = FxHashMap::default();

        g_score.insert(start, 0);
        open.push(Reverse((board.distance(start, end), 0u32, start)));

        while let Some(Reverse((_, g, current))) = open.pop() {
            if current == end {
                return Some(reconstruct_path(&came_from, current));
            }
            if g > g_score.get(&current).copied().unwrap_or(u32::MAX) {
                continue;
            }

            for next in board.neighbors(current) {
                let Some(step) = board.move_cost(next) else {
                    continue;
                };
                if next != end && self.state.is_occupied(next) {
                    continue;
                }

                let tentative = g + step;
                if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                    came_from.insert(next, current);
                    g_score.insert(next, tentative);
                    let f = tentative + board.distance(next, end);
                    open.push(Reverse((f, tentative, next)));
                }
            }
        }

        None
    }

    /// Plan a path and price it
    pub fn plan_action(&self, from: Hex, to: Hex) -> Option<ActionPath> {
        let path = self.find_path(from, to)?;
        let cost = self.path_cost(&path);
        Some(ActionPath {
            from: path[0],
            to: path[path.len() - 1],
            path,
            cost,
        })
    }

    /// Terrain cost of every step after the first
    pub fn path_cost(&self, path: &[Hex]) -> u32 {
        let board = self.state.board();
        path.iter()
            .skip(1)
            .filter_map(|&hex| board.move_cost(hex))
            .sum()
    }
}

fn reconstruct_path(came_from: &FxHashMap<Hex, Hex>, mut current: Hex) -> Vec<Hex> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
