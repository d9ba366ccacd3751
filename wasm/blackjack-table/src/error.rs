//! Error types for the table.

use thiserror::Error;

use crate::game::Phase;

/// Errors raised by cards, the deck and the game session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A rank or suit label did not name a real card.
    #[error("invalid card: rank {rank:?}, suit {suit:?}")]
    InvalidCard {
        /// Rank label as given.
        rank: String,
        /// Suit label as given.
        suit: String,
    },

    /// Draw on an empty deck.
    #[error("out of cards")]
    OutOfCards,

    /// The session could not deal the cards a command needed.
    #[error("deck exhausted: needed {needed} card(s), {remaining} remaining")]
    DeckExhausted {
        /// Cards the command tried to deal.
        needed: usize,
        /// Cards left in the deck when it gave up.
        remaining: usize,
    },

    /// Command invoked in the wrong phase.
    #[error("cannot {action} during {phase}")]
    InvalidState {
        /// The rejected command.
        action: &'static str,
        /// Phase the session was in.
        phase: Phase,
    },
}

impl GameError {
    /// Returns true for errors that indicate a caller bug rather than table state.
    pub fn is_programming_error(&self) -> bool {
        matches!(self, Self::InvalidCard { .. })
    }
}
