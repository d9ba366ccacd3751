use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
pub mod view;

pub use deck::{Card, Color, Deck, Rank, Suit, DECK_SIZE};
pub use error::GameError;
pub use game::{GameSession, Outcome, Participant, Phase, RoundStatus, TableEvent, TableRules};
pub use hand::Hand;
pub use view::TableSnapshot;

/// Single-deck table exposed to JavaScript.
#[wasm_bindgen]
pub struct BlackjackTable {
    session: GameSession,
}

#[wasm_bindgen]
impl BlackjackTable {
    /// `rules` may be `undefined`; `seed` makes every shuffle reproducible.
    #[wasm_bindgen(constructor)]
    pub fn new(rules: &JsValue, seed: Option<u64>) -> Result<BlackjackTable, JsValue> {
        console_error_panic_hook::set_once();
        let rules: TableRules = if rules.is_undefined() || rules.is_null() {
            TableRules::default()
        } else {
            serde_wasm_bindgen::from_value(rules.clone())
                .map_err(|err| JsValue::from_str(&format!("Invalid rules: {err}")))?
        };
        let session = match seed {
            Some(seed) => GameSession::seeded(rules, seed),
            None => GameSession::new(rules),
        };
        Ok(BlackjackTable { session })
    }

    #[wasm_bindgen(js_name = startRound)]
    pub fn start_round(&mut self) -> Result<JsValue, JsValue> {
        let status = self.session.start_round().map_err(reject)?;
        to_js(&status)
    }

    pub fn hit(&mut self) -> Result<JsValue, JsValue> {
        let status = self.session.player_hit().map_err(reject)?;
        to_js(&status)
    }

    pub fn stand(&mut self) -> Result<JsValue, JsValue> {
        let status = self.session.player_stand().map_err(reject)?;
        to_js(&status)
    }

    pub fn outcome(&self) -> Result<JsValue, JsValue> {
        let outcome = self.session.outcome().map_err(reject)?;
        to_js(&outcome)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&TableSnapshot::capture(&self.session))
    }

    #[wasm_bindgen(js_name = deckRemaining)]
    pub fn deck_remaining(&self) -> usize {
        self.session.deck_remaining()
    }

    /// Calls `callback` with every table event, serialized.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.session.subscribe(move |event| match serde_wasm_bindgen::to_value(event) {
            Ok(value) => {
                let _ = callback.call1(&JsValue::NULL, &value);
            }
            Err(err) => console::error_1(&JsValue::from_str(&format!(
                "Serialization failed: {err}"
            ))),
        });
    }
}

fn reject(err: GameError) -> JsValue {
    tracing::warn!(%err, "command rejected");
    let message = format!("Command rejected: {err}");
    console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}
