//! Legality predicates
//!
//! Pure reads over a `GameState`. Nothing here mutates state, and a `false`
//! answer is an ordinary outcome, not an error.

use crate::game::GameState;
use crate::hex::Hex;
use crate::units::Unit;

pub struct Rules<'a> {
    state: &'a GameState,
}

impl<'a> Rules<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    fn own_unit(&self, hex: Hex) -> Option<&'a Unit> {
        self.state
            .get_unit_at(hex)
            .filter(|u| u.owner == self.state.current_player())
    }

    fn distance(&self, a: Hex, b: Hex) -> u32 {
        self.state.board().distance(a, b)
    }

    /// Coarse "could ever reach" test.
    ///
    /// Compares raw hex distance against the unit's *maximum* movement. Terrain
    /// cost and remaining points are ignored; use
    /// `MovementPlanner::can_reach_this_turn` for the strict check.
    pub fn is_valid_move(&self, from: Hex, to: Hex) -> bool {
        let Some(unit) = self.own_unit(from) else {
            return false;
        };
        if !self.state.board().contains(to) || self.state.is_occupied(to) {
            return false;
        }
        if unit.has_attacked() {
            return false;
        }
        self.distance(from, to) <= unit.max_movement()
    }

    pub fn is_valid_attack(&self, from: Hex, to: Hex) -> bool {
        let Some(attacker) = self.own_unit(from) else {
            return false;
        };
        let Some(defender) = self.state.get_unit_at(to) else {
            return false;
        };
        if attacker.owner == defender.owner || attacker.has_attacked() {
            return false;
        }
        self.distance(from, to) <= attacker.attack_range()
    }

    /// Dispatch on the target: empty -> move, enemy in range -> attack,
    /// enemy out of range -> move-then-attack pre-check
    pub fn can_do_action(&self, from: Hex, to: Hex) -> bool {
        let Some(unit) = self.own_unit(from) else {
            return false;
        };
        let distance = self.distance(from, to);

        match self.state.get_unit_at(to) {
            None => self.is_valid_move(from, to),
            Some(_) if distance <= unit.attack_range() => self.is_valid_attack(from, to),
            Some(target) => {
                target.owner != unit.owner
                    && unit.attack_range() > 0
                    && !unit.has_attacked()
                    && distance <= unit.movement()
            }
        }
    }

    /// Target is an enemy beyond attack range, so acting on it means moving first
    pub fn is_lunge(&self, from: Hex, to: Hex) -> bool {
        match (self.state.get_unit_at(from), self.state.get_unit_at(to)) {
            (Some(unit), Some(target)) => {
                target.owner != unit.owner && self.distance(from, to) > unit.attack_range()
            }
            _ => false,
        }
    }
}
