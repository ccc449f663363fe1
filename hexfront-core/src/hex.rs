//! Hex coordinate algebra with axial coordinates
//!
//! A hex is stored as (q, r). The third cube component s = -q - r is
//! always derived, never stored.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),   // E
    (1, -1),  // NE
    (0, -1),  // NW
    (-1, 0),  // W
    (-1, 1),  // SW
    (0, 1),   // SE
];

pub const EAST: u8 = 0;
pub const NORTH_EAST: u8 = 1;
pub const NORTH_WEST: u8 = 2;
pub const WEST: u8 = 3;
pub const SOUTH_WEST: u8 = 4;
pub const SOUTH_EAST: u8 = 5;

/// Diagonal vectors: the six hexes at distance 2 between two neighbor directions
pub const DIAGONALS: [(i32, i32); 6] = [
    (2, -1),
    (1, -2),
    (-1, -1),
    (-2, 1),
    (-1, 2),
    (1, 1),
];

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Derived cube component
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    pub fn scale(self, k: i32) -> Hex {
        Hex::new(self.q * k, self.r * k)
    }

    /// Rotate 60 degrees counter-clockwise around the origin
    pub fn rotate_left(self) -> Hex {
        // (q, r, s) -> (-s, -q, -r)
        Hex::new(-self.s(), -self.q)
    }

    /// Rotate 60 degrees clockwise around the origin
    pub fn rotate_right(self) -> Hex {
        // (q, r, s) -> (-r, -s, -q)
        Hex::new(-self.r, -self.s())
    }

    /// Distance from the origin
    pub fn length(&self) -> u32 {
        (self.q.unsigned_abs() + self.r.unsigned_abs() + self.s().unsigned_abs()) / 2
    }

    /// Distance between two hexes, ignoring any board wrap
    pub fn distance_to(&self, other: Hex) -> u32 {
        (*self - other).length()
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction as usize % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// Get diagonal neighbor (0-5)
    pub fn diagonal_neighbor(&self, index: u8) -> Hex {
        let (dq, dr) = DIAGONALS[index as usize % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    pub fn neighbors(self) -> impl Iterator<Item = Hex> {
        (0..6u8).map(move |d| self.neighbor(d))
    }

    /// All hexes at exactly `radius` from this one (just `self` for radius 0)
    pub fn ring(&self, radius: u32) -> Vec<Hex> {
        if radius == 0 {
            return vec![*self];
        }
        let radius = radius as i32;
        let mut out = Vec::with_capacity(6 * radius as usize);
        // Start at the corner in direction SW, then walk each edge
        let mut current = *self + Hex::from(DIRECTIONS[SOUTH_WEST as usize]).scale(radius);
        for side in 0..6 {
            for _ in 0..radius {
                out.push(current);
                current = current.neighbor(side as u8);
            }
        }
        out
    }

    /// All hexes within `radius`, ordered ring by ring from the center
    pub fn spiral(&self, radius: u32) -> Vec<Hex> {
        (0..=radius).flat_map(|k| self.ring(k)).collect()
    }

    /// Convert to "odd-r" offset coordinates (odd rows shoved right)
    pub fn to_offset(&self) -> OffsetCoord {
        OffsetCoord {
            col: self.q + (self.r - (self.r & 1)) / 2,
            row: self.r,
        }
    }

    pub fn from_offset(offset: OffsetCoord) -> Hex {
        Hex::new(offset.col - (offset.row - (offset.row & 1)) / 2, offset.row)
    }
}

impl From<(i32, i32)> for Hex {
    fn from((q, r): (i32, i32)) -> Self {
        Hex::new(q, r)
    }
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, rhs: Hex) -> Hex {
        Hex::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for Hex {
    type Output = Hex;

    fn sub(self, rhs: Hex) -> Hex {
        Hex::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl Mul<i32> for Hex {
    type Output = Hex;

    fn mul(self, k: i32) -> Hex {
        self.scale(k)
    }
}

/// Rectangular column/row address for layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetCoord {
    pub col: i32,
    pub row: i32,
}

// ============================================================================
// FRACTIONAL HEXES
// ============================================================================

/// Hex with real-valued components, used for interpolation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractionalHex {
    pub q: f64,
    pub r: f64,
}

impl FractionalHex {
    pub fn new(q: f64, r: f64) -> Self {
        Self { q, r }
    }

    pub fn s(&self) -> f64 {
        -self.q - self.r
    }

    /// Linear interpolation, t in [0, 1]
    pub fn lerp(self, other: FractionalHex, t: f64) -> FractionalHex {
        FractionalHex::new(
            self.q + (other.q - self.q) * t,
            self.r + (other.r - self.r) * t,
        )
    }

    /// Round to the nearest integer hex.
    ///
    /// Each axis is rounded independently; the axis with the largest rounding
    /// error is then recomputed from the other two so that q + r + s = 0.
    pub fn round(self) -> Hex {
        let mut q = self.q.round();
        let mut r = self.r.round();
        let s = self.s().round();

        let q_diff = (q - self.q).abs();
        let r_diff = (r - self.r).abs();
        let s_diff = (s - self.s()).abs();

        if q_diff > r_diff && q_diff > s_diff {
            q = -r - s;
        } else if r_diff > s_diff {
            r = -q - s;
        }

        Hex::new(q as i32, r as i32)
    }
}

impl From<Hex> for FractionalHex {
    fn from(hex: Hex) -> Self {
        FractionalHex::new(hex.q as f64, hex.r as f64)
    }
}

/// Straight line of hexes from `a` to `b`, both endpoints included
pub fn hex_line(a: Hex, b: Hex) -> Vec<Hex> {
    let n = a.distance_to(b);
    if n == 0 {
        return vec![a];
    }
    // Nudge off exact edges so ties break the same way every time
    let start = FractionalHex::new(a.q as f64 + 1e-6, a.r as f64 + 1e-6);
    let end = FractionalHex::new(b.q as f64 + 1e-6, b.r as f64 + 1e-6);
    let step = 1.0 / n as f64;
    (0..=n)
        .map(|i| start.lerp(end, step * i as f64).round())
        .collect()
}
