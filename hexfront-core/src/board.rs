//! Cylindrical hex board and terrain
//!
//! The board stores `width * height` tiles addressed by axial (q, r) with
//! q in [0, width) and r in [0, height). Columns wrap around (the board is a
//! cylinder), rows do not.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::hex::Hex;

// ============================================================================
// TERRAIN
// ============================================================================

/// Terrain kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Plains,
    Forest,
    Mountain,
    Water,
}

/// Static terrain properties
#[derive(Clone, Debug)]
pub struct TerrainProps {
    pub name: &'static str,
    pub symbol: char,
    pub passable: bool,
    pub move_cost: u32,
}

impl TerrainProps {
    const fn new(name: &'static str, symbol: char, passable: bool, move_cost: u32) -> Self {
        Self {
            name,
            symbol,
            passable,
            move_cost,
        }
    }
}

/// Indexed by `Terrain as usize`
pub static TERRAIN_PROPS: [TerrainProps; 4] = [
    TerrainProps::new("Plains", '.', true, 1),
    TerrainProps::new("Forest", 'f', true, 2),
    TerrainProps::new("Mountain", 'm', true, 3),
    // Cost is never charged: water is rejected before costs are looked at
    TerrainProps::new("Water", '~', false, 1),
];

impl Terrain {
    pub const ALL: [Terrain; 4] = [
        Terrain::Plains,
        Terrain::Forest,
        Terrain::Mountain,
        Terrain::Water,
    ];

    pub fn props(self) -> &'static TerrainProps {
        &TERRAIN_PROPS[self as usize]
    }

    pub fn is_passable(self) -> bool {
        self.props().passable
    }

    pub fn move_cost(self) -> u32 {
        self.props().move_cost
    }

    pub fn from_symbol(symbol: char) -> Option<Terrain> {
        Terrain::ALL.into_iter().find(|t| t.props().symbol == symbol)
    }
}

/// A single board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            terrain: Terrain::Plains,
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Board {
    /// All-plains board
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Terrain::Plains)
    }

    /// # Panics
    ///
    /// If `width` is zero; column wrapping needs at least one column.
    pub fn filled(width: u32, height: u32, terrain: Terrain) -> Self {
        assert!(width > 0, "board width must be at least 1");
        Self {
            width,
            height,
            tiles: vec![Tile { terrain }; width as usize * height as usize],
        }
    }

    /// Parse a board from text rows, one char per tile.
    ///
    /// Row index is r, column index is q. Whitespace inside a row is ignored.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> GameResult<Self> {
        let mut tiles = Vec::new();
        let mut width = None;

        for (r, row) in rows.iter().enumerate() {
            let mut count = 0u32;
            for ch in row.as_ref().chars().filter(|c| !c.is_whitespace()) {
                let terrain = Terrain::from_symbol(ch).ok_or(GameError::InvalidTerrain(ch))?;
                tiles.push(Tile { terrain });
                count += 1;
            }
            match width {
                None => width = Some(count),
                Some(w) if w != count => {
                    return Err(GameError::MalformedMap(format!(
                        "row {} has {} tiles, expected {}",
                        r, count, w
                    )));
                }
                Some(_) => {}
            }
        }

        let width = width.unwrap_or(0);
        if width == 0 {
            return Err(GameError::MalformedMap("board has no tiles".to_string()));
        }

        Ok(Self {
            width,
            height: rows.len() as u32,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canonicalize a coordinate: q is reduced modulo width, r is untouched
    pub fn wrap(&self, hex: Hex) -> Hex {
        Hex::new(hex.q.rem_euclid(self.width as i32), hex.r)
    }

    /// Check if a (possibly unwrapped) coordinate lands on the board
    pub fn contains(&self, hex: Hex) -> bool {
        hex.r >= 0 && hex.r < self.height as i32
    }

    fn index(&self, hex: Hex) -> Option<usize> {
        if !self.contains(hex) {
            return None;
        }
        let hex = self.wrap(hex);
        Some(hex.r as usize * self.width as usize + hex.q as usize)
    }

    pub fn tile(&self, hex: Hex) -> Option<&Tile> {
        self.index(hex).map(|i| &self.tiles[i])
    }

    pub fn terrain(&self, hex: Hex) -> Option<Terrain> {
        self.tile(hex).map(|t| t.terrain)
    }

    /// On the board and passable
    pub fn is_passable(&self, hex: Hex) -> bool {
        self.terrain(hex).is_some_and(Terrain::is_passable)
    }

    /// Movement cost of entering a hex (None if off-board or impassable)
    pub fn move_cost(&self, hex: Hex) -> Option<u32> {
        self.terrain(hex)
            .filter(|t| t.is_passable())
            .map(Terrain::move_cost)
    }

    pub fn set_terrain(&mut self, hex: Hex, terrain: Terrain) -> GameResult<()> {
        let i = self.index(hex).ok_or(GameError::OffBoard(hex))?;
        self.tiles[i].terrain = terrain;
        Ok(())
    }

    /// On-board neighbors of a hex, already canonicalized
    pub fn neighbors(&self, hex: Hex) -> impl Iterator<Item = Hex> + '_ {
        hex.neighbors()
            .filter(move |n| self.contains(*n))
            .map(move |n| self.wrap(n))
    }

    /// Hex distance on the cylinder: the shortest of going straight or
    /// crossing the seam in either direction
    pub fn distance(&self, a: Hex, b: Hex) -> u32 {
        let a = self.wrap(a);
        let b = self.wrap(b);
        let w = self.width as i32;
        [-w, 0, w]
            .into_iter()
            .map(|shift| a.distance_to(Hex::new(b.q + shift, b.r)))
            .min()
            .unwrap_or(0)
    }

    /// Every canonical position, row by row
    pub fn positions(&self) -> impl Iterator<Item = Hex> + '_ {
        (0..self.height as i32)
            .flat_map(move |r| (0..self.width as i32).map(move |q| Hex::new(q, r)))
    }

    /// Passable positions in row-major order
    pub fn passable_positions(&self) -> Vec<Hex> {
        self.positions().filter(|&h| self.is_passable(h)).collect()
    }
}
