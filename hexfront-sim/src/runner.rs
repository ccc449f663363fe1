//! Game runner - plays whole seeded games
//!
//! Each player is driven by its own `RandomOpponent`. A game ends when one
//! player is left standing, when the round limit passes, or when the turn
//! can't end because a unit had nothing legal to do (a stall).

use hexfront_core::{ActionOutcome, GameResult, GameState, PlayerId, ScenarioConfig};
use rayon::prelude::*;

use crate::config::RunnerConfig;
use crate::opponent::RandomOpponent;

/// Outcome of a single game
#[derive(Clone, Debug)]
pub struct GameOutcome {
    /// Last player standing (None for round limit or stall)
    pub winner: Option<PlayerId>,
    /// Round reached when the game stopped
    pub rounds: u32,
    /// Every resolved action, in order
    pub history: Vec<ActionOutcome>,
    /// The current player could not end their turn
    pub stalled: bool,
    pub final_state: GameState,
}

impl GameOutcome {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Game runner that plays games with seeded opponents
pub struct GameRunner {
    config: RunnerConfig,
}

impl GameRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Play a game from `initial` until it ends
    pub fn play_game(&self, initial: GameState) -> GameResult<GameOutcome> {
        let mut state = initial;
        let mut opponents: Vec<RandomOpponent> = (0..state.players().len() as u64)
            .map(|i| RandomOpponent::new(self.config.seed.wrapping_add(i)))
            .collect();
        let mut history = Vec::new();
        let mut stalled = false;

        tracing::info!(
            "Starting game: {} players, {} units, seed {}",
            state.players().len(),
            state.unit_positions().len(),
            self.config.seed
        );

        while state.winner().is_none() && state.round() <= self.config.max_rounds {
            let player = state.current_player();
            let idx = state
                .players()
                .iter()
                .position(|&p| p == player)
                .unwrap_or(0);

            for _ in 0..self.config.max_actions_per_turn {
                let Some((from, to)) = opponents[idx].choose_action(&state) else {
                    break;
                };
                let outcome = state.resolve_action(from, to)?;
                if !outcome.is_success() {
                    break;
                }
                history.push(outcome);
                if state.winner().is_some() {
                    break;
                }
            }

            if state.winner().is_some() {
                break;
            }
            if !state.end_turn() {
                tracing::warn!(
                    "Round {}: {:?} has an idle unit and cannot end the turn",
                    state.round(),
                    player
                );
                stalled = true;
                break;
            }
        }

        let winner = state.winner();
        tracing::info!(
            "Game over after {} rounds: winner={:?}, {} actions{}",
            state.round(),
            winner,
            history.len(),
            if stalled { " (stalled)" } else { "" }
        );

        Ok(GameOutcome {
            winner,
            rounds: state.round(),
            history,
            stalled,
            final_state: state,
        })
    }
}

/// Build and play one game per seed in parallel. Results are in seed order.
pub fn play_many(
    scenario: &ScenarioConfig,
    config: &RunnerConfig,
    seeds: &[u64],
) -> Vec<GameResult<GameOutcome>> {
    seeds
        .par_iter()
        .map(|&seed| {
            let state = scenario.clone().with_seed(seed).build()?;
            GameRunner::new(config.clone().with_seed(seed)).play_game(state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfront_core::{Board, Hex, Terrain, Unit, UnitKind};

    #[test]
    fn test_play_game_terminates() {
        let state = ScenarioConfig::default().with_seed(4).build().unwrap();
        let outcome = GameRunner::new(RunnerConfig::default().with_max_rounds(20))
            .play_game(state)
            .unwrap();
        assert!(outcome.rounds <= 21);
        assert!(outcome.final_state.is_consistent());
        assert!(!outcome.history.is_empty());
    }

    #[test]
    fn test_play_game_is_reproducible() {
        let scenario = ScenarioConfig::default().with_seed(8);
        let config = RunnerConfig::default().with_seed(3).with_max_rounds(15);
        let a = GameRunner::new(config.clone())
            .play_game(scenario.build().unwrap())
            .unwrap();
        let b = GameRunner::new(config)
            .play_game(scenario.build().unwrap())
            .unwrap();
        assert_eq!(a.history, b.history);
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.final_state.unit_positions(), b.final_state.unit_positions());
    }

    #[test]
    fn test_boxed_in_unit_stalls() {
        let mut state =
            GameState::with_player_count(Board::filled(6, 6, Terrain::Water), 2).unwrap();
        for hex in [Hex::new(1, 1), Hex::new(4, 4)] {
            state.set_terrain(hex, Terrain::Plains).unwrap();
        }
        state
            .place_unit_at(Hex::new(1, 1), Unit::new(PlayerId(0), UnitKind::Infantry))
            .unwrap();
        state
            .place_unit_at(Hex::new(4, 4), Unit::new(PlayerId(1), UnitKind::Infantry))
            .unwrap();

        let outcome = GameRunner::new(RunnerConfig::default()).play_game(state).unwrap();
        assert!(outcome.stalled);
        assert!(outcome.is_draw());
        assert!(outcome.history.is_empty());
        assert_eq!(outcome.rounds, 1);
    }

    #[test]
    fn test_play_many_matches_sequential() {
        let scenario = ScenarioConfig::default().with_army(vec![UnitKind::Cavalry, UnitKind::Archer]);
        let config = RunnerConfig::default().with_max_rounds(10);
        let seeds = [1, 2, 3, 4];

        let batch = play_many(&scenario, &config, &seeds);
        assert_eq!(batch.len(), seeds.len());

        for (&seed, result) in seeds.iter().zip(&batch) {
            let parallel = result.as_ref().unwrap();
            let sequential = GameRunner::new(config.clone().with_seed(seed))
                .play_game(scenario.clone().with_seed(seed).build().unwrap())
                .unwrap();
            assert_eq!(parallel.history, sequential.history);
            assert_eq!(parallel.winner, sequential.winner);
        }
    }
}
