//! Action execution: moving along planned paths and resolving attacks
//!
//! This is the only code that changes units after setup. Every call runs to
//! completion; the one non-atomic behavior is partial movement, which stops
//! at the last affordable step and keeps what was committed.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::game::GameState;
use crate::hex::Hex;
use crate::planner::{ActionPath, MovementPlanner};
use crate::rules::Rules;
use crate::units::Unit;

/// Result of a single attack
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub attacker: Hex,
    pub defender: Hex,
    pub damage: u32,
    pub defender_hp: u32,
    /// Defender died and the attacker moved onto its tile
    pub captured: bool,
}

/// What `resolve_action` did
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// Illegal or currently impossible; nothing changed
    Rejected,
    Moved {
        from: Hex,
        to: Hex,
        spent: u32,
    },
    Attacked(AttackReport),
    /// `attack` is None when movement ran out before reaching striking distance
    MovedThenAttacked {
        from: Hex,
        stopped_at: Hex,
        spent: u32,
        attack: Option<AttackReport>,
    },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ActionOutcome::Rejected)
    }
}

/// Applies actions that `resolve_action` has already validated.
///
/// Still refuses anything that would corrupt state: units that are not the
/// current player's, non-adjacent steps, occupied steps and friendly targets.
pub(crate) struct ActionExecutor<'a> {
    state: &'a mut GameState,
}

impl<'a> ActionExecutor<'a> {
    pub(crate) fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Walk the unit at `path.from` along the path.
    ///
    /// Stops early (without error) at the first step the unit can't pay for
    /// or can't legally take. Returns where it stopped and how much movement
    /// it spent.
    pub(crate) fn move_unit(&mut self, path: &ActionPath) -> GameResult<(Hex, u32)> {
        self.walk(path.from, path.path.get(1..).unwrap_or_default())
    }

    /// Walk all but the last step, then attack `path.to` if the unit made it
    /// to the penultimate tile. A short walk is kept, not rolled back.
    pub(crate) fn move_then_attack(
        &mut self,
        path: &ActionPath,
    ) -> GameResult<(Hex, u32, Option<AttackReport>)> {
        let n = path.path.len();
        if n < 2 {
            return Err(GameError::NoUnitAt(path.to));
        }

        let (stopped_at, spent) = self.walk(path.from, &path.path[1..n - 1])?;
        let board = self.state.board();
        if stopped_at != board.wrap(path.path[n - 2]) {
            tracing::debug!(
                "Lunge from {:?} stalled at {:?}, attack on {:?} skipped",
                path.from,
                stopped_at,
                path.to
            );
            return Ok((stopped_at, spent, None));
        }

        let report = self.attack(stopped_at, path.to)?;
        Ok((stopped_at, spent, Some(report)))
    }

    /// Resolve an attack. Range is not checked here; ownership and targets
    /// are, before anything changes.
    pub(crate) fn attack(&mut self, from: Hex, to: Hex) -> GameResult<AttackReport> {
        let board = self.state.board();
        let (from, to) = (board.wrap(from), board.wrap(to));

        let attacker = self.acting_unit(from)?;
        let (owner, damage) = (attacker.owner, attacker.attack_damage());
        let defender = self.state.get_unit_at(to).ok_or(GameError::NoUnitAt(to))?;
        if from == to || defender.owner == owner {
            return Err(GameError::FriendlyTarget(to));
        }

        let defender_hp = self
            .state
            .unit_at_mut(to)
            .ok_or(GameError::NoUnitAt(to))?
            .take_damage(damage);

        if let Some(attacker) = self.state.unit_at_mut(from) {
            attacker.mark_attacked();
        }

        let captured = defender_hp == 0;
        if captured {
            if let Some(dead) = self.state.remove_unit_at(to) {
                tracing::debug!("{:?} {:?} destroyed at {:?}", dead.owner, dead.kind, to);
            }
            self.state.move_unit_internal(from, to)?;
        }

        tracing::debug!(
            "Attack {:?} -> {:?}: {} damage, {} hp left{}",
            from,
            to,
            damage,
            defender_hp,
            if captured { ", captured" } else { "" }
        );
        debug_assert!(self.state.is_consistent());

        Ok(AttackReport {
            attacker: from,
            defender: to,
            damage,
            defender_hp,
            captured,
        })
    }

    /// The unit at `hex`, which must belong to the player whose turn it is
    fn acting_unit(&self, hex: Hex) -> GameResult<&Unit> {
        let unit = self.state.get_unit_at(hex).ok_or(GameError::NoUnitAt(hex))?;
        if unit.owner != self.state.current_player() {
            return Err(GameError::NotCurrentPlayer(unit.owner));
        }
        Ok(unit)
    }

    fn walk(&mut self, from: Hex, steps: &[Hex]) -> GameResult<(Hex, u32)> {
        let start = self.state.board().wrap(from);
        self.acting_unit(start)?;

        let mut current = start;
        let mut spent = 0;
        for &next in steps {
            let board = self.state.board();
            if !board.contains(next) || board.distance(current, next) != 1 {
                break;
            }
            let Some(cost) = board.move_cost(next) else {
                break;
            };
            if self.state.is_occupied(next) {
                break;
            }
            let remaining = self
                .state
                .get_unit_at(current)
                .ok_or(GameError::NoUnitAt(current))?
                .movement();
            if remaining < cost {
                break;
            }

            self.state.move_unit_internal(current, next)?;
            current = self.state.board().wrap(next);
            if let Some(unit) = self.state.unit_at_mut(current) {
                unit.spend_movement(cost);
            }
            spent += cost;
        }

        if spent > 0 {
            tracing::debug!("Moved {:?} -> {:?} for {}", start, current, spent);
        }
        debug_assert!(self.state.is_consistent());
        Ok((current, spent))
    }
}

impl GameState {
    /// Validate and apply the action of the unit at `from` targeting `to`.
    ///
    /// Empty target: plan and move. Enemy in range: attack. Enemy beyond
    /// range: plan, move next to it and attack. Anything `Rules` refuses, that
    /// has no path, or that can't afford even its first step is `Rejected`
    /// with no state change.
    pub fn resolve_action(&mut self, from: Hex, to: Hex) -> GameResult<ActionOutcome> {
        let rules = Rules::new(self);
        if !rules.can_do_action(from, to) {
            return Ok(ActionOutcome::Rejected);
        }
        let lunge = rules.is_lunge(from, to);

        if !self.is_occupied(to) {
            let Some(plan) = MovementPlanner::new(self).plan_action(from, to) else {
                return Ok(ActionOutcome::Rejected);
            };
            let (stopped, spent) = ActionExecutor::new(self).move_unit(&plan)?;
            if spent == 0 {
                return Ok(ActionOutcome::Rejected);
            }
            return Ok(ActionOutcome::Moved {
                from: plan.from,
                to: stopped,
                spent,
            });
        }

        if !lunge {
            let report = ActionExecutor::new(self).attack(from, to)?;
            return Ok(ActionOutcome::Attacked(report));
        }

        let Some(plan) = MovementPlanner::new(self).plan_action(from, to) else {
            return Ok(ActionOutcome::Rejected);
        };
        let (stopped_at, spent, attack) = ActionExecutor::new(self).move_then_attack(&plan)?;
        if spent == 0 && attack.is_none() {
            return Ok(ActionOutcome::Rejected);
        }
        Ok(ActionOutcome::MovedThenAttacked {
            from: plan.from,
            stopped_at,
            spent,
            attack,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Terrain};
    use crate::game::PlayerId;
    use crate::units::{Unit, UnitKind, UnitPhase};

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn game() -> GameState {
        GameState::with_player_count(Board::new(10, 10), 2).unwrap()
    }

    fn path(cells: &[(i32, i32)]) -> ActionPath {
        let path: Vec<Hex> = cells.iter().map(|&c| Hex::from(c)).collect();
        ActionPath {
            from: path[0],
            to: path[path.len() - 1],
            path,
            cost: 0,
        }
    }

    #[test]
    fn test_attack_damage() {
        let mut game = game();
        game.place_unit_at(Hex::new(2, 2), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(3, 2), Unit::new(P1, UnitKind::Infantry))
            .unwrap();

        let report = ActionExecutor::new(&mut game)
            .attack(Hex::new(2, 2), Hex::new(3, 2))
            .unwrap();
        assert_eq!(report.damage, 4);
        assert_eq!(report.defender_hp, 6);
        assert!(!report.captured);

        assert_eq!(game.get_unit_at(Hex::new(3, 2)).unwrap().hp(), 6);
        let attacker = game.get_unit_at(Hex::new(2, 2)).unwrap();
        assert_eq!(attacker.phase(), UnitPhase::Attacked);
        assert_eq!(attacker.movement(), 0);
    }

    #[test]
    fn test_kill_captures_tile() {
        let mut game = game();
        game.place_unit_at(Hex::new(2, 2), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(4, 2), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(3, 2), Unit::new(P1, UnitKind::Worker))
            .unwrap();

        let mut exec = ActionExecutor::new(&mut game);
        let first = exec.attack(Hex::new(2, 2), Hex::new(3, 2)).unwrap();
        assert_eq!(first.defender_hp, 1);
        let second = exec.attack(Hex::new(4, 2), Hex::new(3, 2)).unwrap();
        assert_eq!(second.defender_hp, 0);
        assert!(second.captured);

        assert!(game.get_unit_at(Hex::new(4, 2)).is_none());
        let captor = game.get_unit_at(Hex::new(3, 2)).unwrap();
        assert_eq!(captor.owner, P0);
        assert!(captor.has_attacked());
        assert_eq!(game.unit_count(P1), 0);
        assert_eq!(game.positions_of(P0), vec![Hex::new(2, 2), Hex::new(3, 2)]);
        assert!(game.is_consistent());
    }

    #[test]
    fn test_attack_missing_units() {
        let mut game = game();
        game.place_unit_at(Hex::new(2, 2), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        let mut exec = ActionExecutor::new(&mut game);
        assert_eq!(
            exec.attack(Hex::new(2, 2), Hex::new(3, 2)),
            Err(GameError::NoUnitAt(Hex::new(3, 2)))
        );
        assert_eq!(
            exec.attack(Hex::new(5, 5), Hex::new(2, 2)),
            Err(GameError::NoUnitAt(Hex::new(5, 5)))
        );
        // Failed attack left the attacker untouched
        assert!(!game.get_unit_at(Hex::new(2, 2)).unwrap().has_acted());
    }

    #[test]
    fn test_move_full_path() {
        let mut game = game();
        game.place_unit_at(Hex::new(0, 1), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        let (stopped, spent) = ActionExecutor::new(&mut game)
            .move_unit(&path(&[(0, 1), (-1, 1), (-2, 1)]))
            .unwrap();
        assert_eq!(stopped, Hex::new(8, 1));
        assert_eq!(spent, 2);
        assert_eq!(game.get_unit_at(Hex::new(8, 1)).unwrap().movement(), 0);
        assert!(game.get_unit_at(Hex::new(0, 1)).is_none());
    }

    #[test]
    fn test_partial_move_truncates() {
        let mut game = game();
        game.set_terrain(Hex::new(2, 1), Terrain::Forest).unwrap();
        game.place_unit_at(Hex::new(0, 1), Unit::new(P0, UnitKind::Infantry))
            .unwrap();

        let (stopped, spent) = ActionExecutor::new(&mut game)
            .move_unit(&path(&[(0, 1), (1, 1), (2, 1), (3, 1)]))
            .unwrap();
        // 1 spent on plains, forest costs 2 with only 1 left
        assert_eq!(stopped, Hex::new(1, 1));
        assert_eq!(spent, 1);
        let unit = game.get_unit_at(Hex::new(1, 1)).unwrap();
        assert_eq!(unit.movement(), 1);
        assert_eq!(unit.phase(), UnitPhase::Moved);
    }

    #[test]
    fn test_move_missing_unit_fails() {
        let mut game = game();
        assert_eq!(
            ActionExecutor::new(&mut game).move_unit(&path(&[(0, 1), (1, 1)])),
            Err(GameError::NoUnitAt(Hex::new(0, 1)))
        );
    }

    #[test]
    fn test_move_then_attack() {
        let mut game = game();
        game.place_unit_at(Hex::new(1, 1), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(3, 1), Unit::new(P1, UnitKind::Archer))
            .unwrap();

        let (stopped, spent, report) = ActionExecutor::new(&mut game)
            .move_then_attack(&path(&[(1, 1), (2, 1), (3, 1)]))
            .unwrap();
        assert_eq!(stopped, Hex::new(2, 1));
        assert_eq!(spent, 1);
        let report = report.unwrap();
        assert_eq!(report.defender_hp, 2);
        assert!(game.get_unit_at(Hex::new(2, 1)).unwrap().has_attacked());
    }

    #[test]
    fn test_move_then_attack_stall_keeps_partial_move() {
        let mut game = game();
        game.set_terrain(Hex::new(2, 1), Terrain::Forest).unwrap();
        game.place_unit_at(Hex::new(1, 1), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(4, 1), Unit::new(P1, UnitKind::Infantry))
            .unwrap();

        let (stopped, spent, report) = ActionExecutor::new(&mut game)
            .move_then_attack(&path(&[(1, 1), (2, 1), (3, 1), (4, 1)]))
            .unwrap();
        assert_eq!(stopped, Hex::new(2, 1));
        assert_eq!(spent, 2);
        assert!(report.is_none());

        let unit = game.get_unit_at(Hex::new(2, 1)).unwrap();
        assert!(!unit.has_attacked());
        assert_eq!(unit.movement(), 0);
        assert_eq!(game.get_unit_at(Hex::new(4, 1)).unwrap().hp(), 10);
    }

    #[test]
    fn test_resolve_action_dispatch() {
        let mut game = game();
        game.place_unit_at(Hex::new(2, 2), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(5, 5), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(3, 2), Unit::new(P1, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(5, 7), Unit::new(P1, UnitKind::Worker))
            .unwrap();

        // Too far: rejected, nothing changes
        assert_eq!(
            game.resolve_action(Hex::new(2, 2), Hex::new(2, 6)).unwrap(),
            ActionOutcome::Rejected
        );
        // Enemy unit is not ours to move
        assert!(!game
            .resolve_action(Hex::new(3, 2), Hex::new(3, 3))
            .unwrap()
            .is_success());

        // Adjacent enemy: plain attack
        let outcome = game.resolve_action(Hex::new(2, 2), Hex::new(3, 2)).unwrap();
        assert!(matches!(outcome, ActionOutcome::Attacked(ref r) if r.defender_hp == 6));

        // Enemy two away: move next to it, then attack
        let outcome = game.resolve_action(Hex::new(5, 5), Hex::new(5, 7)).unwrap();
        match outcome {
            ActionOutcome::MovedThenAttacked {
                stopped_at, attack, ..
            } => {
                assert_eq!(stopped_at, Hex::new(5, 6));
                assert_eq!(attack.unwrap().defender_hp, 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(game.can_end_turn());
        assert!(game.is_consistent());
    }

    #[test]
    fn test_resolve_plain_move() {
        let mut game = game();
        game.place_unit_at(Hex::new(4, 4), Unit::new(P0, UnitKind::Cavalry))
            .unwrap();
        let outcome = game.resolve_action(Hex::new(4, 4), Hex::new(1, 4)).unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Moved {
                from: Hex::new(4, 4),
                to: Hex::new(1, 4),
                spent: 3,
            }
        );
        assert_eq!(game.get_unit_at(Hex::new(1, 4)).unwrap().movement(), 1);
    }

    #[test]
    fn test_move_stops_at_non_adjacent_step() {
        let mut game = game();
        game.place_unit_at(Hex::new(1, 1), Unit::new(P0, UnitKind::Cavalry))
            .unwrap();
        let (stopped, spent) = ActionExecutor::new(&mut game)
            .move_unit(&path(&[(1, 1), (7, 8)]))
            .unwrap();
        assert_eq!((stopped, spent), (Hex::new(1, 1), 0));
        assert!(game.get_unit_at(Hex::new(7, 8)).is_none());
        assert!(!game.get_unit_at(Hex::new(1, 1)).unwrap().has_acted());
    }

    #[test]
    fn test_move_stops_before_occupied_step() {
        let mut game = game();
        game.place_unit_at(Hex::new(1, 1), Unit::new(P0, UnitKind::Cavalry))
            .unwrap();
        game.place_unit_at(Hex::new(3, 1), Unit::new(P1, UnitKind::Infantry))
            .unwrap();
        let (stopped, spent) = ActionExecutor::new(&mut game)
            .move_unit(&path(&[(1, 1), (2, 1), (3, 1), (4, 1)]))
            .unwrap();
        assert_eq!((stopped, spent), (Hex::new(2, 1), 1));
        assert_eq!(game.get_unit_at(Hex::new(3, 1)).unwrap().owner, P1);
        assert!(game.is_consistent());
    }

    #[test]
    fn test_move_out_of_turn_fails() {
        let mut game = game();
        game.place_unit_at(Hex::new(1, 1), Unit::new(P1, UnitKind::Infantry))
            .unwrap();
        assert_eq!(
            ActionExecutor::new(&mut game).move_unit(&path(&[(1, 1), (2, 1)])),
            Err(GameError::NotCurrentPlayer(P1))
        );
        assert!(game.get_unit_at(Hex::new(1, 1)).is_some());
        assert!(game.get_unit_at(Hex::new(2, 1)).is_none());
    }

    #[test]
    fn test_attack_on_friend_or_self_changes_nothing() {
        let mut game = game();
        game.place_unit_at(Hex::new(3, 3), Unit::new(P0, UnitKind::Archer))
            .unwrap();
        game.place_unit_at(Hex::new(4, 3), Unit::new(P0, UnitKind::Archer))
            .unwrap();
        game.place_unit_at(Hex::new(6, 6), Unit::new(P1, UnitKind::Archer))
            .unwrap();

        let mut exec = ActionExecutor::new(&mut game);
        assert_eq!(
            exec.attack(Hex::new(3, 3), Hex::new(4, 3)),
            Err(GameError::FriendlyTarget(Hex::new(4, 3)))
        );
        assert_eq!(
            exec.attack(Hex::new(3, 3), Hex::new(13, 3)),
            Err(GameError::FriendlyTarget(Hex::new(3, 3)))
        );
        assert_eq!(
            exec.attack(Hex::new(6, 6), Hex::new(3, 3)),
            Err(GameError::NotCurrentPlayer(P1))
        );

        for hex in [Hex::new(3, 3), Hex::new(4, 3), Hex::new(6, 6)] {
            let unit = game.get_unit_at(hex).unwrap();
            assert_eq!(unit.hp(), unit.max_hp());
            assert!(!unit.has_acted());
        }
        assert!(game.is_consistent());
    }

    #[test]
    fn test_resolve_move_without_movement_left_is_rejected() {
        let mut game = game();
        game.place_unit_at(Hex::new(4, 4), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        let first = game.resolve_action(Hex::new(4, 4), Hex::new(6, 4)).unwrap();
        assert!(matches!(first, ActionOutcome::Moved { spent: 2, .. }));

        let back = game.resolve_action(Hex::new(6, 4), Hex::new(4, 4)).unwrap();
        assert_eq!(back, ActionOutcome::Rejected);
        assert!(!back.is_success());
        assert!(game.get_unit_at(Hex::new(6, 4)).is_some());
        assert!(game.get_unit_at(Hex::new(4, 4)).is_none());
    }

    #[test]
    fn test_resolve_lunge_without_first_step_is_rejected() {
        let mut game = game();
        game.place_unit_at(Hex::new(4, 4), Unit::new(P0, UnitKind::Infantry))
            .unwrap();
        game.place_unit_at(Hex::new(6, 4), Unit::new(P1, UnitKind::Infantry))
            .unwrap();
        for n in Hex::new(4, 4).neighbors() {
            game.set_terrain(n, Terrain::Mountain).unwrap();
        }

        let outcome = game.resolve_action(Hex::new(4, 4), Hex::new(6, 4)).unwrap();
        assert_eq!(outcome, ActionOutcome::Rejected);
        let unit = game.get_unit_at(Hex::new(4, 4)).unwrap();
        assert_eq!(unit.phase(), UnitPhase::Fresh);
        assert_eq!(game.get_unit_at(Hex::new(6, 4)).unwrap().hp(), 10);
    }
}
