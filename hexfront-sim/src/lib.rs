//! HEXFRONT Sim - Drives the core engine through whole games
//!
//! This crate is a consumer of the core's query, planning and mutation
//! surfaces:
//! - A seeded random opponent that picks legal actions
//! - A game runner that plays seeded games to a winner, a round limit or a stall
//! - Batch play over many seeds in parallel

mod config;
mod opponent;
mod runner;

pub use config::RunnerConfig;
pub use opponent::RandomOpponent;
pub use runner::{play_many, GameOutcome, GameRunner};
