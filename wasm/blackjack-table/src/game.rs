use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    deck::{Card, Deck},
    error::GameError,
    hand::Hand,
};

/// Cards dealt at the start of every round: dealer, player, dealer, player.
pub const OPENING_CARDS: usize = 4;

/// Index of the dealer's face-down card while the player acts.
pub const HOLE_CARD_INDEX: usize = 0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Phase {
    NotStarted,
    PlayerTurn,
    DealerTurn,
    RoundOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Phase::NotStarted => "not started",
            Phase::PlayerTurn => "player turn",
            Phase::DealerTurn => "dealer turn",
            Phase::RoundOver => "round over",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    PlayerBust,
    DealerBust,
    PlayerWin,
    DealerWin,
    Push,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Participant {
    Dealer,
    Player,
}

/// Notifications for a presentation layer. Delivered after the change they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TableEvent {
    CardDealt {
        participant: Participant,
        card: Card,
        face_down: bool,
        deck_remaining: usize,
    },
    HoleCardRevealed {
        card: Card,
    },
    RoundEnded {
        outcome: Outcome,
    },
}

/// Returned by every command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStatus {
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

fn default_dealer_stands_on() -> u8 {
    17
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRules {
    /// Dealer draws while below this total.
    pub dealer_stands_on: u8,
    pub dealer_hits_soft_17: bool,
    /// End the round on a two-card 21 instead of waiting for the player to stand.
    pub resolve_naturals: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        TableRules {
            dealer_stands_on: default_dealer_stands_on(),
            dealer_hits_soft_17: false,
            resolve_naturals: false,
        }
    }
}

type Listener = Box<dyn FnMut(&TableEvent)>;

/// Owns the deck, both hands and the round phase.
///
/// Commands are atomic: a failed command leaves every piece of state as it was and
/// notifies no listener.
pub struct GameSession {
    deck: Deck,
    dealer: Hand,
    player: Hand,
    phase: Phase,
    outcome: Option<Outcome>,
    rules: TableRules,
    listeners: Vec<Listener>,
}

impl GameSession {
    pub fn new(rules: TableRules) -> Self {
        Self::with_deck(rules, Deck::new())
    }

    /// Session whose shuffles are reproducible.
    pub fn seeded(rules: TableRules, seed: u64) -> Self {
        Self::with_deck(rules, Deck::with_seed(seed))
    }

    fn with_deck(rules: TableRules, deck: Deck) -> Self {
        GameSession {
            deck,
            dealer: Hand::new(),
            player: Hand::new(),
            phase: Phase::NotStarted,
            outcome: None,
            rules,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&TableEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Rebuilds and shuffles the deck, clears both hands and deals the opening cards.
    pub fn start_round(&mut self) -> Result<RoundStatus, GameError> {
        self.expect_round_startable()?;
        self.deck.initialize();
        self.deck.shuffle();
        self.deal_opening()
    }

    /// Like [`start_round`](Self::start_round), but deals from `deck` as given.
    pub fn start_round_from(&mut self, deck: Deck) -> Result<RoundStatus, GameError> {
        self.expect_round_startable()?;
        if deck.remaining() < OPENING_CARDS {
            return Err(GameError::DeckExhausted {
                needed: OPENING_CARDS,
                remaining: deck.remaining(),
            });
        }
        self.deck.replace_cards(deck);
        self.deal_opening()
    }

    pub fn player_hit(&mut self) -> Result<RoundStatus, GameError> {
        self.expect_phase(Phase::PlayerTurn, "hit")?;
        let card = self.deck.draw().map_err(|_| GameError::DeckExhausted {
            needed: 1,
            remaining: 0,
        })?;
        self.player.add_card(card);
        debug!(%card, total = self.player.total_value(), "player hits");

        let mut events = vec![TableEvent::CardDealt {
            participant: Participant::Player,
            card,
            face_down: false,
            deck_remaining: self.deck.remaining(),
        }];
        if self.player.is_bust() {
            self.reveal_hole_card(&mut events);
            self.finish(Outcome::PlayerBust, &mut events);
        }
        self.emit(events);
        Ok(self.status())
    }

    /// Ends the player's turn and plays out the dealer's hand.
    pub fn player_stand(&mut self) -> Result<RoundStatus, GameError> {
        self.expect_phase(Phase::PlayerTurn, "stand")?;
        let saved_dealer = self.dealer.clone();
        self.phase = Phase::DealerTurn;
        debug!(total = self.player.total_value(), "player stands");

        let mut events = Vec::new();
        self.reveal_hole_card(&mut events);

        let mut drawn = Vec::new();
        while self.dealer_should_draw() {
            let Ok(card) = self.deck.draw() else {
                self.deck.restore(&drawn);
                self.dealer = saved_dealer;
                self.phase = Phase::PlayerTurn;
                return Err(GameError::DeckExhausted {
                    needed: 1,
                    remaining: 0,
                });
            };
            drawn.push(card);
            self.dealer.add_card(card);
            debug!(%card, total = self.dealer.total_value(), "dealer draws");
            events.push(TableEvent::CardDealt {
                participant: Participant::Dealer,
                card,
                face_down: false,
                deck_remaining: self.deck.remaining(),
            });
        }

        let outcome = if self.dealer.is_bust() {
            Outcome::DealerBust
        } else {
            match self.player.total_value().cmp(&self.dealer.total_value()) {
                Ordering::Greater => Outcome::PlayerWin,
                Ordering::Less => Outcome::DealerWin,
                Ordering::Equal => Outcome::Push,
            }
        };
        self.finish(outcome, &mut events);
        self.emit(events);
        Ok(self.status())
    }

    pub fn outcome(&self) -> Result<Outcome, GameError> {
        match (self.phase, self.outcome) {
            (Phase::RoundOver, Some(outcome)) => Ok(outcome),
            _ => Err(GameError::InvalidState {
                action: "read the outcome",
                phase: self.phase,
            }),
        }
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    /// Index into the dealer hand of the card a player must not see, if any.
    pub fn hidden_dealer_card(&self) -> Option<usize> {
        (self.phase == Phase::PlayerTurn && !self.dealer.is_empty()).then_some(HOLE_CARD_INDEX)
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus {
            phase: self.phase,
            outcome: self.outcome,
        }
    }

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidState {
                action,
                phase: self.phase,
            })
        }
    }

    fn expect_round_startable(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::NotStarted | Phase::RoundOver => Ok(()),
            phase => Err(GameError::InvalidState {
                action: "start a round",
                phase,
            }),
        }
    }

    fn deal_opening(&mut self) -> Result<RoundStatus, GameError> {
        let remaining = self.deck.remaining();
        if remaining < OPENING_CARDS {
            return Err(GameError::DeckExhausted {
                needed: OPENING_CARDS,
                remaining,
            });
        }
        self.dealer.clear();
        self.player.clear();
        self.outcome = None;

        let mut events = Vec::with_capacity(OPENING_CARDS + 2);
        for i in 0..OPENING_CARDS {
            let participant = if i % 2 == 0 {
                Participant::Dealer
            } else {
                Participant::Player
            };
            let card = self.deck.draw().map_err(|_| GameError::DeckExhausted {
                needed: OPENING_CARDS - i,
                remaining: 0,
            })?;
            let face_down = i == HOLE_CARD_INDEX;
            match participant {
                Participant::Dealer => self.dealer.add_card(card),
                Participant::Player => self.player.add_card(card),
            }
            events.push(TableEvent::CardDealt {
                participant,
                card,
                face_down,
                deck_remaining: self.deck.remaining(),
            });
        }
        self.phase = Phase::PlayerTurn;
        info!(
            player_total = self.player.total_value(),
            deck_remaining = self.deck.remaining(),
            "round started"
        );

        if self.rules.resolve_naturals {
            if let Some(outcome) = self.natural_outcome() {
                self.reveal_hole_card(&mut events);
                self.finish(outcome, &mut events);
            }
        }
        self.emit(events);
        Ok(self.status())
    }

    fn natural_outcome(&self) -> Option<Outcome> {
        match (self.player.is_blackjack(), self.dealer.is_blackjack()) {
            (true, true) => Some(Outcome::Push),
            (true, false) => Some(Outcome::PlayerWin),
            (false, true) => Some(Outcome::DealerWin),
            (false, false) => None,
        }
    }

    fn dealer_should_draw(&self) -> bool {
        let total = self.dealer.total_value();
        total < self.rules.dealer_stands_on
            || (self.rules.dealer_hits_soft_17 && total == 17 && self.dealer.is_soft())
    }

    fn reveal_hole_card(&self, events: &mut Vec<TableEvent>) {
        if let Some(&card) = self.dealer.cards().get(HOLE_CARD_INDEX) {
            events.push(TableEvent::HoleCardRevealed { card });
        }
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<TableEvent>) {
        self.phase = Phase::RoundOver;
        self.outcome = Some(outcome);
        info!(
            ?outcome,
            player_total = self.player.total_value(),
            dealer_total = self.dealer.total_value(),
            "round over"
        );
        events.push(TableEvent::RoundEnded { outcome });
    }

    fn emit(&mut self, events: Vec<TableEvent>) {
        for event in &events {
            for listener in &mut self.listeners {
                listener(event);
            }
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(TableRules::default())
    }
}
