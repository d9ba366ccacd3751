use std::{fmt, str::FromStr};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Cards in a full single deck.
pub const DECK_SIZE: usize = 52;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Blackjack points. An Ace is worth 11 here; `Hand` reduces it to 1 when needed.
    pub fn point_value(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl FromStr for Rank {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::ALL
            .into_iter()
            .find(|rank| rank.label() == s)
            .ok_or_else(|| GameError::InvalidCard {
                rank: s.to_string(),
                suit: String::new(),
            })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        }
    }
}

impl FromStr for Suit {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suit::ALL
            .into_iter()
            .find(|suit| suit.name() == s)
            .ok_or_else(|| GameError::InvalidCard {
                rank: String::new(),
                suit: s.to_string(),
            })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

/// A playing card. Immutable once built.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    /// Builds a card from its text labels, e.g. `("Q", "Spades")`.
    pub fn from_labels(rank: &str, suit: &str) -> Result<Self, GameError> {
        let invalid = || GameError::InvalidCard {
            rank: rank.to_string(),
            suit: suit.to_string(),
        };
        let rank = rank.parse::<Rank>().map_err(|_| invalid())?;
        let suit = suit.parse::<Suit>().map_err(|_| invalid())?;
        Ok(Card { rank, suit })
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn point_value(&self) -> u8 {
        self.rank.point_value()
    }

    pub fn display_symbol(&self) -> char {
        self.suit.symbol()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rank.label(), self.display_symbol())
    }
}

/// A single 52-card deck. Cards are drawn from the end of the sequence.
pub struct Deck {
    cards: Vec<Card>,
    rng: SmallRng,
}

impl Deck {
    /// Full deck in canonical order, shuffled with an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Full deck in canonical order with a reproducible shuffle sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        let mut deck = Deck {
            cards: Vec::with_capacity(DECK_SIZE),
            rng,
        };
        deck.initialize();
        deck
    }

    /// A deck holding exactly `cards`; the last card is drawn first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Deck {
            cards,
            rng: SmallRng::seed_from_u64(0),
        }
    }

    /// Refills the deck with all 52 cards, suits outer and ranks inner.
    pub fn initialize(&mut self) {
        self.cards.clear();
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                self.cards.push(Card::new(rank, suit));
            }
        }
    }

    /// Fisher-Yates over the current contents.
    pub fn shuffle(&mut self) {
        for i in (1..self.cards.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            self.cards.swap(i, j);
        }
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::OutOfCards)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Undrawn cards, bottom first.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    // Takes over the cards of `other`, keeping this deck's generator.
    pub(crate) fn replace_cards(&mut self, other: Deck) {
        self.cards = other.cards;
    }

    // Puts cards back on top in the order they were drawn, undoing those draws.
    pub(crate) fn restore(&mut self, drawn: &[Card]) {
        self.cards.extend(drawn.iter().rev());
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn point_values() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).point_value(), 11);
        assert_eq!(Card::new(Rank::Seven, Suit::Clubs).point_value(), 7);
        assert_eq!(Card::new(Rank::Ten, Suit::Hearts).point_value(), 10);
        for face in [Rank::Jack, Rank::Queen, Rank::King] {
            assert_eq!(Card::new(face, Suit::Diamonds).point_value(), 10);
        }
    }

    #[test]
    fn colors_follow_suit() {
        assert_eq!(Card::new(Rank::Two, Suit::Hearts).color(), Color::Red);
        assert_eq!(Card::new(Rank::Two, Suit::Diamonds).color(), Color::Red);
        assert_eq!(Card::new(Rank::Two, Suit::Clubs).color(), Color::Black);
        assert_eq!(Card::new(Rank::Two, Suit::Spades).color(), Color::Black);
    }

    #[test]
    fn display_uses_glyph() {
        assert_eq!(Card::new(Rank::Ace, Suit::Hearts).to_string(), "A ♥");
        assert_eq!(Card::new(Rank::Ten, Suit::Spades).to_string(), "10 ♠");
    }

    #[test]
    fn labels_parse_or_fail() {
        let card = Card::from_labels("Q", "Spades").unwrap();
        assert_eq!(card, Card::new(Rank::Queen, Suit::Spades));

        let err = Card::from_labels("1", "Spades").unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidCard { rank: "1".into(), suit: "Spades".into() }
        );
        assert!(Card::from_labels("K", "Stars").is_err());
    }

    #[test]
    fn fresh_deck_is_canonical() {
        let deck = Deck::with_seed(7);
        assert_eq!(deck.remaining(), DECK_SIZE);
        assert_eq!(deck.cards()[0], Card::new(Rank::Ace, Suit::Hearts));
        assert_eq!(deck.cards()[13], Card::new(Rank::Ace, Suit::Diamonds));
        assert_eq!(deck.cards()[51], Card::new(Rank::King, Suit::Spades));

        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn initialize_resets_after_draws_and_shuffle() {
        let mut deck = Deck::with_seed(3);
        deck.shuffle();
        deck.draw().unwrap();
        deck.initialize();
        assert_eq!(deck.cards(), Deck::with_seed(99).cards());
    }

    #[test]
    fn draw_takes_from_the_end() {
        let a = Card::new(Rank::Two, Suit::Clubs);
        let b = Card::new(Rank::Nine, Suit::Hearts);
        let mut deck = Deck::from_cards(vec![a, b]);
        assert_eq!(deck.draw(), Ok(b));
        assert_eq!(deck.draw(), Ok(a));
        assert_eq!(deck.draw(), Err(GameError::OutOfCards));
    }

    #[test]
    fn restore_undoes_draws() {
        let mut deck = Deck::with_seed(11);
        deck.shuffle();
        let before = deck.cards().to_vec();
        let drawn = vec![deck.draw().unwrap(), deck.draw().unwrap()];
        deck.restore(&drawn);
        assert_eq!(deck.cards(), before.as_slice());
    }

    #[test]
    fn seeded_shuffles_are_reproducible() {
        let mut a = Deck::with_seed(42);
        let mut b = Deck::with_seed(42);
        a.shuffle();
        b.shuffle();
        assert_eq!(a.cards(), b.cards());
    }
}
