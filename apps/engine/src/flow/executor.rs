//! The mutation choke point for cross-player card moves.
//!
//! No validation happens here: handlers validate first, then call in. Every
//! operation is an exactly-once relocation; a card's identity is preserved
//! and never cloned across a move.

use tracing::debug;

use crate::config::RoomRules;
use crate::domain::cards::{Card, CardId, PlayerId, PropertyColor};
use crate::errors::EngineError;
use crate::store::hands::HandPartition;
use crate::store::{DeckStore, HandStore};

/// Result of a discard that may have triggered a hand refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefillReport {
    pub discarded: CardId,
    pub refilled: usize,
}

/// Result of a two-way table-hand swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeReport {
    /// Card the initiator received; true when it is a color-agnostic wildcard
    /// whose new owner must declare a color.
    pub taken: CardId,
    pub taken_was_wildcard: bool,
    /// Card the target received.
    pub given: CardId,
    pub given_was_wildcard: bool,
}

#[derive(Debug)]
pub struct ActionExecutor<'a> {
    hands: &'a HandStore,
    deck: &'a DeckStore,
    rules: &'a RoomRules,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(hands: &'a HandStore, deck: &'a DeckStore, rules: &'a RoomRules) -> Self {
        Self { hands, deck, rules }
    }

    /// Draw up to `n` cards into the player's free hand. Returns the drawn
    /// ids; fewer than `n` only at total card exhaustion.
    pub fn draw_cards(&self, player: PlayerId, n: usize) -> Result<Vec<CardId>, EngineError> {
        let cards = self.deck.draw(n);
        let ids: Vec<CardId> = cards.iter().map(|c| c.id).collect();
        self.hands.with_hands(player, |hands| {
            for card in cards {
                hands.add_free(card);
            }
            Ok(())
        })?;
        debug!(%player, count = ids.len(), "drew cards");
        Ok(ids)
    }

    /// Discard one card from the free hand; if that empties the hand, draw a
    /// fresh refill.
    pub fn discard_and_refill_if_empty(
        &self,
        player: PlayerId,
        card_id: CardId,
    ) -> Result<RefillReport, EngineError> {
        self.hands.with_hands(player, |hands| {
            let card = hands.remove_free(card_id)?;
            self.deck.discard(card);
            let refilled = if hands.free().is_empty() {
                let fresh = self.deck.draw(self.rules.refill_size);
                let count = fresh.len();
                for card in fresh {
                    hands.add_free(card);
                }
                count
            } else {
                0
            };
            Ok(RefillReport {
                discarded: card_id,
                refilled,
            })
        })
    }

    /// Relocate one table card from one player to another, keeping its color
    /// assignment. Returns the color and whether the card was a wildcard.
    pub fn move_table_card(
        &self,
        from: PlayerId,
        to: PlayerId,
        card_id: CardId,
    ) -> Result<(PropertyColor, bool), EngineError> {
        self.hands.with_two(from, to, |src, dst| {
            let (color, card) = src.remove_from_table(card_id)?;
            let was_wildcard = card.wildcard_scope().is_some();
            dst.add_to_table(color, card);
            Ok((color, was_wildcard))
        })
    }

    /// Two-way table-hand swap under a single two-player critical section.
    pub fn swap_table_cards(
        &self,
        initiator: PlayerId,
        give_id: CardId,
        target: PlayerId,
        take_id: CardId,
    ) -> Result<TradeReport, EngineError> {
        self.hands.with_two(initiator, target, |ini, tgt| {
            let (give_color, give) = ini.remove_from_table(give_id)?;
            let (take_color, take) = match tgt.remove_from_table(take_id) {
                Ok(found) => found,
                Err(err) => {
                    // Undo the first detach so a half-applied swap never
                    // escapes the critical section.
                    ini.add_to_table(give_color, give);
                    return Err(err);
                }
            };
            let report = TradeReport {
                taken: take.id,
                taken_was_wildcard: take.wildcard_scope().is_some(),
                given: give.id,
                given_was_wildcard: give.wildcard_scope().is_some(),
            };
            tgt.add_to_table(give_color, give);
            ini.add_to_table(take_color, take);
            Ok(report)
        })
    }

    /// Atomically detach an entire color group from one player and reattach
    /// it (properties, wildcards, and buildings alike) to another.
    pub fn execute_full_set_takeover(
        &self,
        from: PlayerId,
        to: PlayerId,
        color: PropertyColor,
    ) -> Result<Vec<CardId>, EngineError> {
        let moved = self.hands.with_two(from, to, |src, dst| {
            let group = src.take_group(color)?;
            let ids: Vec<CardId> = group.iter().map(|c| c.id).collect();
            for card in group {
                dst.add_to_table(color, card);
            }
            Ok(ids)
        })?;
        debug!(%from, %to, ?color, cards = moved.len(), "full set takeover");
        Ok(moved)
    }

    /// Move a building card from the player's free hand onto one of their
    /// table groups.
    pub fn execute_build_on_set(
        &self,
        player: PlayerId,
        card_id: CardId,
        color: PropertyColor,
    ) -> Result<(), EngineError> {
        self.hands.with_hands(player, |hands| {
            let card = hands.remove_free(card_id)?;
            hands.add_to_table(color, card);
            Ok(())
        })
    }

    /// Move payment cards from payer to beneficiary, each card at its own
    /// bank value, no change-making. Money and banked command cards land in
    /// the beneficiary's bank; property-like cards and buildings keep their
    /// color assignment and land on the table.
    pub fn transfer_payment(
        &self,
        payer: PlayerId,
        beneficiary: PlayerId,
        card_ids: &[CardId],
    ) -> Result<Vec<CardId>, EngineError> {
        self.hands.with_two(payer, beneficiary, |src, dst| {
            let mut moved = Vec::with_capacity(card_ids.len());
            for &id in card_ids {
                match src.find_card_partition(id)? {
                    HandPartition::Bank => {
                        let card = src.remove_bank(id)?;
                        dst.add_bank(card);
                    }
                    HandPartition::Table => {
                        let (color, card) = src.remove_from_table(id)?;
                        if card.counts_toward_set() || card.building_tier().is_some() {
                            dst.add_to_table(color, card);
                        } else {
                            dst.add_bank(card);
                        }
                    }
                    HandPartition::Free => {
                        // find_card_partition never reports the free hand;
                        // demands cannot reach it.
                        return Err(EngineError::invariant(
                            "payment lookup returned the free hand",
                        ));
                    }
                }
                moved.push(id);
            }
            Ok(moved)
        })
    }

    /// Move an already-relocated wildcard between its owner's color groups.
    pub fn reassign_wildcard_color(
        &self,
        player: PlayerId,
        card_id: CardId,
        color: PropertyColor,
    ) -> Result<(), EngineError> {
        self.hands.with_hands(player, |hands| {
            let (_, card) = hands.remove_from_table(card_id)?;
            hands.add_to_table(color, card);
            Ok(())
        })
    }

    pub fn complete_set_count(&self, player: PlayerId) -> Result<usize, EngineError> {
        self.hands.with_hands(player, |hands| Ok(hands.complete_set_count()))
    }
}
