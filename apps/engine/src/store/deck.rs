//! Thread-safe draw/discard piles with reshuffle-on-empty.
//!
//! Both piles sit behind a single room-wide lock: reshuffling must atomically
//! swap the discard pile into the draw pile, and a check-then-act split across
//! two locks would let a concurrent draw lose cards between the check and the
//! swap. The empty-check is re-verified after acquiring the lock.

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::domain::cards::{Card, CardId};
use crate::errors::{EngineError, NotFoundKind};

#[derive(Debug)]
struct Piles {
    /// Last-in-first-out; the tail is the top of the pile.
    draw: Vec<Card>,
    discard: Vec<Card>,
}

#[derive(Debug)]
pub struct DeckStore {
    piles: Mutex<Piles>,
    rng: Mutex<ChaCha20Rng>,
}

impl DeckStore {
    /// Build a deck from an already-validated, already-shuffled card list.
    /// The seed drives reshuffles only.
    pub fn new(cards: Vec<Card>, seed: [u8; 32]) -> Self {
        Self {
            piles: Mutex::new(Piles {
                draw: cards,
                discard: Vec::new(),
            }),
            rng: Mutex::new(ChaCha20Rng::from_seed(seed)),
        }
    }

    /// Pop up to `n` cards off the draw pile, reshuffling the discard pile in
    /// when the draw pile runs dry. Returns fewer than `n` only at total card
    /// exhaustion; callers must tolerate a short draw.
    pub fn draw(&self, n: usize) -> Vec<Card> {
        let mut piles = self.piles.lock();
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            if piles.draw.is_empty() {
                self.reshuffle_locked(&mut piles);
            }
            match piles.draw.pop() {
                Some(card) => out.push(card),
                None => break,
            }
        }
        out
    }

    /// Swap the discard pile into the draw pile as one indivisible exchange.
    ///
    /// Re-verifies emptiness under the lock: the caller's emptiness check and
    /// this swap must observe the same pile state.
    fn reshuffle_locked(&self, piles: &mut Piles) {
        if !piles.draw.is_empty() || piles.discard.is_empty() {
            return;
        }
        let mut pile = std::mem::take(&mut piles.discard);
        pile.shuffle(&mut *self.rng.lock());
        debug!(cards = pile.len(), "reshuffled discard pile into draw pile");
        piles.draw = pile;
    }

    pub fn discard(&self, card: Card) {
        self.piles.lock().discard.push(card);
    }

    /// Most recently discarded card.
    pub fn peek_last_discard(&self) -> Result<Card, EngineError> {
        self.piles
            .lock()
            .discard
            .last()
            .cloned()
            .ok_or_else(|| EngineError::not_found(NotFoundKind::DiscardEmpty, "discard pile is empty"))
    }

    pub fn draw_len(&self) -> usize {
        self.piles.lock().draw.len()
    }

    pub fn discard_len(&self) -> usize {
        self.piles.lock().discard.len()
    }

    /// Ids of every card currently in either pile. Conservation checks only.
    pub fn card_ids(&self) -> Vec<CardId> {
        let piles = self.piles.lock();
        piles
            .draw
            .iter()
            .chain(piles.discard.iter())
            .map(|c| c.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::fixtures;

    fn deck_of(n: usize) -> DeckStore {
        let cards = (0..n).map(|i| fixtures::money(i as u32)).collect();
        DeckStore::new(cards, [7u8; 32])
    }

    #[test]
    fn draw_pops_in_lifo_order() {
        let deck = deck_of(3);
        let drawn = deck.draw(2);
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].bank_value, 2);
        assert_eq!(drawn[1].bank_value, 1);
        assert_eq!(deck.draw_len(), 1);
    }

    #[test]
    fn underflow_reshuffles_discard_exactly_once() {
        let deck = deck_of(1);
        for v in [10, 11, 12, 13, 14] {
            deck.discard(fixtures::money(v));
        }
        assert_eq!(deck.draw_len(), 1);
        assert_eq!(deck.discard_len(), 5);

        let drawn = deck.draw(3);
        assert_eq!(drawn.len(), 3);
        assert_eq!(deck.discard_len(), 0);
        assert_eq!(deck.draw_len(), 3);

        // No card observed twice, none lost.
        let mut ids: HashSet<_> = drawn.iter().map(|c| c.id).collect();
        for id in deck.card_ids() {
            assert!(ids.insert(id), "card {id} seen twice");
        }
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn exhausted_deck_returns_short_draw() {
        let deck = deck_of(2);
        let drawn = deck.draw(5);
        assert_eq!(drawn.len(), 2);
        assert!(deck.draw(1).is_empty());
    }

    #[test]
    fn peek_last_discard_sees_most_recent() {
        let deck = deck_of(0);
        assert!(deck.peek_last_discard().is_err());

        let first = fixtures::money(1);
        let second = fixtures::money(2);
        let second_id = second.id;
        deck.discard(first);
        deck.discard(second);
        assert_eq!(deck.peek_last_discard().unwrap().id, second_id);
    }
}
