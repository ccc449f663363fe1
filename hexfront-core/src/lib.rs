//! HEXFRONT Core - Rules and simulation engine
//!
//! This crate provides the deterministic core of a turn-based hex tactics game:
//! - Hex coordinate algebra (axial coordinates, rounding, lines, offset layout)
//! - A cylindrical board that wraps horizontally, with terrain costs
//! - Authoritative game state with occupancy and per-owner indices
//! - Legality rules, movement planning (reachability + A*) and action execution
//! - Turn control, seeded spawn placement and scenario configuration

pub mod board;
pub mod combat;
pub mod config;
pub mod error;
pub mod game;
pub mod hex;
pub mod planner;
pub mod rules;
pub mod spawn;
pub mod turn;
pub mod units;

// Re-exports for convenient access
pub use board::{Board, Terrain, Tile, TERRAIN_PROPS};
pub use combat::{ActionOutcome, AttackReport};
pub use config::ScenarioConfig;
pub use error::{GameError, GameResult};
pub use game::{GameState, PlayerId, UnitId};
pub use hex::{hex_line, FractionalHex, Hex, OffsetCoord, DIAGONALS, DIRECTIONS};
pub use planner::{ActionPath, MovementPlanner};
pub use rules::Rules;
pub use spawn::generate_spawns;
pub use units::{Unit, UnitKind, UnitPhase, UnitType, UNIT_TYPES};
