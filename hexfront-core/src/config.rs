//! Scenario configuration
//!
//! A scenario is everything needed to build a starting `GameState`: board
//! size or terrain rows, player count, the army each player fields, and the
//! seed for spawn placement.

use anyhow::Context;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::board::Board;
use crate::error::{GameError, GameResult};
use crate::game::GameState;
use crate::hex::Hex;
use crate::spawn::generate_spawns;
use crate::units::{Unit, UnitKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub width: u32,
    pub height: u32,
    pub players: u8,
    /// Units each player starts with; the first stands on the spawn point
    pub army: Vec<UnitKind>,
    pub seed: u64,
    /// Minimum distance between player spawn points
    pub min_spawn_distance: u32,
    /// Terrain rows (`.` plains, `f` forest, `m` mountain, `~` water).
    /// Overrides `width` and `height` when present.
    pub terrain: Option<Vec<String>>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            players: 2,
            army: vec![UnitKind::Infantry, UnitKind::Archer, UnitKind::Cavalry],
            seed: 0,
            min_spawn_distance: 5,
            terrain: None,
        }
    }
}

impl ScenarioConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_players(mut self, players: u8) -> Self {
        self.players = players;
        self
    }

    pub fn with_min_spawn_distance(mut self, distance: u32) -> Self {
        self.min_spawn_distance = distance;
        self
    }

    pub fn with_army(mut self, army: Vec<UnitKind>) -> Self {
        self.army = army;
        self
    }

    pub fn with_terrain<S: Into<String>>(mut self, rows: impl IntoIterator<Item = S>) -> Self {
        self.terrain = Some(rows.into_iter().map(Into::into).collect());
        self
    }

    pub fn board(&self) -> GameResult<Board> {
        match &self.terrain {
            Some(rows) => Board::from_rows(rows.as_slice()),
            None if self.width == 0 || self.height == 0 => Err(GameError::MalformedMap(
                format!("board must be at least 1x1, got {}x{}", self.width, self.height),
            )),
            None => Ok(Board::new(self.width, self.height)),
        }
    }

    /// Build the starting state, with the first player's turn started
    pub fn build(&self) -> GameResult<GameState> {
        let mut state = GameState::with_player_count(self.board()?, self.players)?;
        let players = state.players().to_vec();
        let camps = generate_spawns(
            state.board(),
            self.seed,
            players.len(),
            self.min_spawn_distance,
        )?;

        let mut slots: Vec<_> = camps
            .iter()
            .map(|&camp| deploy_slots(state.board(), camp, self.army.len()).into_iter())
            .collect();

        // Round-robin: every player places their n-th unit before anyone places an (n+1)-th
        for (placed, &kind) in self.army.iter().enumerate() {
            for (&player, player_slots) in players.iter().zip(slots.iter_mut()) {
                let hex = player_slots
                    .find(|&h| !state.is_occupied(h))
                    .ok_or(GameError::SpawnExhausted {
                        requested: self.army.len(),
                        placed,
                    })?;
                state.place_unit_at(hex, Unit::new(player, kind))?;
            }
        }

        let first = state.current_player();
        state.start_turn(first)?;
        tracing::debug!(
            "Built {}x{} scenario with {} players (seed {})",
            state.board().width(),
            state.board().height(),
            self.players,
            self.seed
        );
        Ok(state)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Passable tiles around a spawn point, nearest first, canonical and unique
fn deploy_slots(board: &Board, camp: Hex, wanted: usize) -> Vec<Hex> {
    let mut seen = FxHashSet::default();
    let max_radius = board.width().max(board.height());
    let mut slots = Vec::new();

    for radius in 0..=max_radius {
        for hex in camp.ring(radius) {
            if board.is_passable(hex) && seen.insert(board.wrap(hex)) {
                slots.push(board.wrap(hex));
            }
        }
        if slots.len() >= wanted {
            break;
        }
    }
    slots
}
