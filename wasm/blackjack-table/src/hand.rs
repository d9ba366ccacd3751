use serde::Serialize;

use crate::deck::Card;

pub const BLACKJACK: u8 = 21;

/// Cards held by one participant. Totals are recomputed from the cards on every query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total_value(&self) -> u8 {
        self.value().0
    }

    /// True when an Ace is still counted as 11.
    pub fn is_soft(&self) -> bool {
        self.value().1
    }

    pub fn is_bust(&self) -> bool {
        self.total_value() > BLACKJACK
    }

    /// Two-card 21.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total_value() == BLACKJACK
    }

    fn value(&self) -> (u8, bool) {
        let mut total: u16 = 0;
        let mut aces = 0;
        for card in &self.cards {
            total += u16::from(card.point_value());
            if card.is_ace() {
                aces += 1;
            }
        }
        while total > u16::from(BLACKJACK) && aces > 0 {
            total -= 10;
            aces -= 1;
        }
        (total.min(u16::from(u8::MAX)) as u8, aces > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        let mut hand = Hand::new();
        for &rank in ranks {
            hand.add_card(Card::new(rank, Suit::Clubs));
        }
        hand
    }

    #[test]
    fn empty_hand_is_zero() {
        let hand = Hand::new();
        assert_eq!(hand.total_value(), 0);
        assert!(!hand.is_bust());
        assert!(!hand.is_soft());
    }

    #[test]
    fn aces_reduce_one_at_a_time() {
        assert_eq!(hand(&[Rank::Ace, Rank::Ace, Rank::Nine]).total_value(), 21);
        assert_eq!(hand(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Nine]).total_value(), 12);
        assert_eq!(hand(&[Rank::Ace, Rank::Ace]).total_value(), 12);
        assert_eq!(hand(&[Rank::Ace, Rank::King, Rank::Five]).total_value(), 16);
    }

    #[test]
    fn soft_and_hard() {
        assert!(hand(&[Rank::Ace, Rank::Six]).is_soft());
        assert!(!hand(&[Rank::Ace, Rank::Six, Rank::King]).is_soft());
        assert!(hand(&[Rank::Ace, Rank::Ace, Rank::Nine]).is_soft());
    }

    #[test]
    fn bust_over_twenty_one() {
        let busted = hand(&[Rank::King, Rank::Queen, Rank::Five]);
        assert_eq!(busted.total_value(), 25);
        assert!(busted.is_bust());
        assert!(!hand(&[Rank::King, Rank::Queen, Rank::Ace]).is_bust());
    }

    #[test]
    fn blackjack_needs_two_cards() {
        assert!(hand(&[Rank::Ace, Rank::Jack]).is_blackjack());
        assert!(!hand(&[Rank::Seven, Rank::Seven, Rank::Seven]).is_blackjack());
    }

    #[test]
    fn clear_empties() {
        let mut h = hand(&[Rank::Two, Rank::Three]);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.total_value(), 0);
    }
}
