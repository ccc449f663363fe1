//! Turn control: whose turn it is and when it may end

use crate::error::{GameError, GameResult};
use crate::game::{GameState, PlayerId};

impl GameState {
    /// True iff every unit of the current player has moved or attacked.
    ///
    /// A player with no units can always end their turn.
    pub fn can_end_turn(&self) -> bool {
        let player = self.current_player();
        self.units()
            .filter(|(_, unit)| unit.owner == player)
            .all(|(_, unit)| unit.has_acted())
    }

    /// Reset movement and attack flags for every unit of `player`
    pub fn start_turn(&mut self, player: PlayerId) -> GameResult<()> {
        if !self.is_registered(player) {
            return Err(GameError::UnknownPlayer(player));
        }
        let count = self.refresh_units(player);
        tracing::debug!("Start of turn for {:?}: {} units refreshed", player, count);
        Ok(())
    }

    /// End the current turn and start the next player's.
    ///
    /// Returns `false` (and changes nothing) while some unit of the current
    /// player is still fresh.
    pub fn end_turn(&mut self) -> bool {
        if !self.can_end_turn() {
            return false;
        }

        self.current = (self.current + 1) % self.players.len();
        if self.current == 0 {
            self.round += 1;
        }

        let next = self.current_player();
        let count = self.refresh_units(next);
        tracing::debug!(
            "Round {}: turn passes to {:?} ({} units)",
            self.round,
            next,
            count
        );
        true
    }

    fn refresh_units(&mut self, player: PlayerId) -> usize {
        let mut count = 0;
        for unit in self.player_units_mut(player) {
            unit.reset_turn();
            count += 1;
        }
        count
    }
}
