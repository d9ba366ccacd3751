//! Player-facing snapshot of the table.
//!
//! The dealer's hole card is masked while the player acts, and so is the dealer total.

use serde::Serialize;

use crate::{
    deck::{Card, Color},
    game::{GameSession, Outcome, Phase},
    hand::Hand,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub face_down: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CardView {
    fn face_up(card: &Card) -> Self {
        CardView {
            face_down: false,
            rank: Some(card.rank().label().to_string()),
            suit: Some(card.suit().name().to_string()),
            symbol: Some(card.display_symbol()),
            color: Some(card.color()),
            label: Some(card.to_string()),
        }
    }

    fn face_down() -> Self {
        CardView {
            face_down: true,
            rank: None,
            suit: None,
            symbol: None,
            color: None,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandView {
    pub cards: Vec<CardView>,
    /// `None` while any card is face down.
    pub total: Option<u8>,
}

impl HandView {
    fn build(hand: &Hand, hidden: Option<usize>) -> Self {
        let cards = hand
            .cards()
            .iter()
            .enumerate()
            .map(|(index, card)| {
                if Some(index) == hidden {
                    CardView::face_down()
                } else {
                    CardView::face_up(card)
                }
            })
            .collect();
        HandView {
            cards,
            total: hidden.is_none().then(|| hand.total_value()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub deck_remaining: usize,
    pub dealer: HandView,
    pub player: HandView,
}

impl TableSnapshot {
    pub fn capture(session: &GameSession) -> Self {
        let status = session.status();
        TableSnapshot {
            phase: status.phase,
            outcome: status.outcome,
            deck_remaining: session.deck_remaining(),
            dealer: HandView::build(session.dealer_hand(), session.hidden_dealer_card()),
            player: HandView::build(session.player_hand(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        deck::{Deck, Rank, Suit},
        game::TableRules,
    };

    fn started() -> GameSession {
        let mut session = GameSession::seeded(TableRules::default(), 1);
        let order = [Rank::King, Rank::Nine, Rank::Seven, Rank::Ace];
        let cards = order.iter().rev().map(|&r| Card::new(r, Suit::Hearts)).collect();
        session.start_round_from(Deck::from_cards(cards)).unwrap();
        session
    }

    #[test]
    fn hole_card_and_dealer_total_are_masked() {
        let snapshot = TableSnapshot::capture(&started());
        assert!(snapshot.dealer.cards[0].face_down);
        assert_eq!(snapshot.dealer.cards[0].rank, None);
        assert_eq!(snapshot.dealer.cards[1].label.as_deref(), Some("7 ♥"));
        assert_eq!(snapshot.dealer.total, None);
        assert_eq!(snapshot.player.total, Some(20));
    }

    #[test]
    fn everything_shows_after_the_round() {
        let mut session = started();
        session.player_stand().unwrap();
        let snapshot = TableSnapshot::capture(&session);
        assert!(snapshot.dealer.cards.iter().all(|c| !c.face_down));
        assert_eq!(snapshot.dealer.total, Some(17));
        assert_eq!(snapshot.outcome, Some(Outcome::PlayerWin));
    }

    #[test]
    fn serializes_in_camel_case() {
        let value = serde_json::to_value(TableSnapshot::capture(&started())).unwrap();
        assert_eq!(value["phase"], "PlayerTurn");
        assert_eq!(value["deckRemaining"], 0);
        assert_eq!(value["dealer"]["cards"][0], serde_json::json!({ "faceDown": true }));
        assert_eq!(value["player"]["cards"][1]["color"], "red");
        assert!(value.get("outcome").is_none());
    }
}
