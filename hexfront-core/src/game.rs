//! Authoritative game state
//!
//! `GameState` is the sole owner of the board, every unit and every index.
//! Other components get read-only views; the only mutating entry points are
//! placement, the action executor and end-of-turn.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Terrain};
use crate::error::{GameError, GameResult};
use crate::hex::Hex;
use crate::units::Unit;

/// Player identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// Stable unit identity, independent of position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,

    /// Owning store for all units
    units: FxHashMap<UnitId, Unit>,

    /// Position -> unit (at most one unit per position)
    occupancy: FxHashMap<Hex, UnitId>,

    /// Per-owner indices
    units_by_owner: FxHashMap<PlayerId, FxHashSet<UnitId>>,
    positions_by_owner: FxHashMap<PlayerId, FxHashSet<Hex>>,

    /// Turn order and pointer into it
    pub(crate) players: Vec<PlayerId>,
    pub(crate) current: usize,

    /// Increments each time turn order wraps back to the first player
    pub(crate) round: u32,

    next_unit_id: u32,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create an empty game; the first player in `players` moves first
    pub fn new(board: Board, players: Vec<PlayerId>) -> GameResult<Self> {
        if players.is_empty() {
            return Err(GameError::NoPlayers);
        }

        let units_by_owner = players.iter().map(|&p| (p, FxHashSet::default())).collect();
        let positions_by_owner = players.iter().map(|&p| (p, FxHashSet::default())).collect();

        Ok(Self {
            board,
            units: FxHashMap::default(),
            occupancy: FxHashMap::default(),
            units_by_owner,
            positions_by_owner,
            players,
            current: 0,
            round: 1,
            next_unit_id: 0,
        })
    }

    /// Create a game with players `0..count`
    pub fn with_player_count(board: Board, count: u8) -> GameResult<Self> {
        Self::new(board, (0..count).map(PlayerId).collect())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Terrain edits for scenario construction
    pub fn set_terrain(&mut self, hex: Hex, terrain: Terrain) -> GameResult<()> {
        self.board.set_terrain(hex, terrain)
    }

    pub fn current_player(&self) -> PlayerId {
        self.players[self.current]
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_registered(&self, player: PlayerId) -> bool {
        self.units_by_owner.contains_key(&player)
    }

    /// Get unit at hex
    pub fn get_unit_at(&self, hex: Hex) -> Option<&Unit> {
        self.unit_id_at(hex).and_then(|id| self.units.get(&id))
    }

    pub fn unit_id_at(&self, hex: Hex) -> Option<UnitId> {
        self.occupancy.get(&self.board.wrap(hex)).copied()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.unit_id_at(hex).is_some()
    }

    /// Iterate units on board, in position order
    pub fn units(&self) -> impl Iterator<Item = (Hex, &Unit)> + '_ {
        self.unit_positions()
            .into_iter()
            .filter_map(move |hex| self.get_unit_at(hex).map(|u| (hex, u)))
    }

    /// All occupied positions, sorted
    pub fn unit_positions(&self) -> Vec<Hex> {
        let mut out: Vec<Hex> = self.occupancy.keys().copied().collect();
        out.sort_unstable();
        out
    }

    /// Positions held by one player, sorted
    pub fn positions_of(&self, player: PlayerId) -> Vec<Hex> {
        let mut out: Vec<Hex> = self
            .positions_by_owner
            .get(&player)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    pub fn unit_count(&self, player: PlayerId) -> usize {
        self.units_by_owner.get(&player).map_or(0, |set| set.len())
    }

    /// The last player standing, if every other player has been eliminated
    pub fn winner(&self) -> Option<PlayerId> {
        let mut alive = self.players.iter().filter(|&&p| self.unit_count(p) > 0);
        match (alive.next(), alive.next()) {
            (Some(&p), None) if self.players.len() > 1 => Some(p),
            _ => None,
        }
    }

    // ========================================================================
    // MUTATION (crate-internal besides placement)
    // ========================================================================

    /// Place a unit on an empty tile
    pub fn place_unit_at(&mut self, hex: Hex, unit: Unit) -> GameResult<UnitId> {
        if !self.board.contains(hex) {
            return Err(GameError::OffBoard(hex));
        }
        let hex = self.board.wrap(hex);
        if self.occupancy.contains_key(&hex) {
            return Err(GameError::Occupied(hex));
        }
        let owner = unit.owner;
        if !self.is_registered(owner) {
            return Err(GameError::UnknownPlayer(owner));
        }

        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;

        self.units.insert(id, unit);
        self.occupancy.insert(hex, id);
        self.owner_units_mut(owner).insert(id);
        self.owner_positions_mut(owner).insert(hex);
        Ok(id)
    }

    /// Remove and return the unit at hex; no-op if empty
    pub(crate) fn remove_unit_at(&mut self, hex: Hex) -> Option<Unit> {
        let hex = self.board.wrap(hex);
        let id = self.occupancy.remove(&hex)?;
        let unit = self.units.remove(&id)?;
        self.owner_units_mut(unit.owner).remove(&id);
        self.owner_positions_mut(unit.owner).remove(&hex);
        Some(unit)
    }

    /// Relocate a unit without touching hp or movement
    pub(crate) fn move_unit_internal(&mut self, from: Hex, to: Hex) -> GameResult<()> {
        let from = self.board.wrap(from);
        let id = *self.occupancy.get(&from).ok_or(GameError::NoUnitAt(from))?;
        if !self.board.contains(to) {
            return Err(GameError::OffBoard(to));
        }
        let to = self.board.wrap(to);
        if to == from {
            return Ok(());
        }
        if self.occupancy.contains_key(&to) {
            return Err(GameError::Occupied(to));
        }

        let owner = self.units[&id].owner;
        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        let positions = self.owner_positions_mut(owner);
        positions.remove(&from);
        positions.insert(to);
        Ok(())
    }

    pub(crate) fn unit_at_mut(&mut self, hex: Hex) -> Option<&mut Unit> {
        let id = self.unit_id_at(hex)?;
        self.units.get_mut(&id)
    }

    pub(crate) fn player_units_mut(
        &mut self,
        player: PlayerId,
    ) -> impl Iterator<Item = &mut Unit> + '_ {
        self.units.values_mut().filter(move |u| u.owner == player)
    }

    fn owner_units_mut(&mut self, owner: PlayerId) -> &mut FxHashSet<UnitId> {
        self.units_by_owner.entry(owner).or_default()
    }

    fn owner_positions_mut(&mut self, owner: PlayerId) -> &mut FxHashSet<Hex> {
        self.positions_by_owner.entry(owner).or_default()
    }

    // ========================================================================
    // INVARIANTS
    // ========================================================================

    /// Check that every index agrees with the position -> unit map
    pub fn is_consistent(&self) -> bool {
        if self.occupancy.len() != self.units.len() {
            return false;
        }

        let mut seen_units = FxHashSet::default();
        for (&hex, id) in &self.occupancy {
            let Some(unit) = self.units.get(id) else {
                return false;
            };
            if !seen_units.insert(*id) || self.board.wrap(hex) != hex {
                return false;
            }
            let owned = self.units_by_owner.get(&unit.owner).is_some_and(|s| s.contains(id));
            let placed = self
                .positions_by_owner
                .get(&unit.owner)
                .is_some_and(|s| s.contains(&hex));
            if !owned || !placed || unit.hp() == 0 || unit.hp() > unit.max_hp() {
                return false;
            }
            if unit.movement() > unit.max_movement() || (unit.has_attacked() && unit.movement() > 0) {
                return false;
            }
        }

        let owned_total: usize = self.units_by_owner.values().map(|s| s.len()).sum();
        let placed_total: usize = self.positions_by_owner.values().map(|s| s.len()).sum();
        owned_total == self.units.len() && placed_total == self.occupancy.len()
    }
}
