//! Seeded spawn placement
//!
//! Same board and seed always give the same positions; no global RNG state.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::Board;
use crate::error::{GameError, GameResult};
use crate::hex::Hex;

/// Pick `count` passable positions, pairwise at least `min_distance` apart
/// (measured on the cylinder).
///
/// Candidates are shuffled with the seed and taken greedily.
pub fn generate_spawns(
    board: &Board,
    seed: u64,
    count: usize,
    min_distance: u32,
) -> GameResult<Vec<Hex>> {
    let mut candidates = board.passable_positions();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    candidates.shuffle(&mut rng);

    let mut chosen: Vec<Hex> = Vec::with_capacity(count);
    for hex in candidates {
        if chosen.len() == count {
            break;
        }
        if chosen.iter().all(|&c| board.distance(c, hex) >= min_distance) {
            chosen.push(hex);
        }
    }

    if chosen.len() < count {
        return Err(GameError::SpawnExhausted {
            requested: count,
            placed: chosen.len(),
        });
    }

    tracing::debug!("Spawns for seed {}: {:?}", seed, chosen);
    Ok(chosen)
}
