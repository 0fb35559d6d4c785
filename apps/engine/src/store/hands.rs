//! Thread-safe per-player card storage.
//!
//! Each player's cards are partitioned into a free hand, a table hand (a map
//! from property color to an ordered card list), and a bank hand. All
//! mutation happens under that player's exclusive lock. Operations spanning
//! two players lock in ascending `PlayerId` order; the deck lock may be taken
//! while holding player locks, never the other way around.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::domain::cards::{Card, CardId, PlayerId, PropertyColor};
use crate::domain::rules;
use crate::domain::snapshot::{CardView, PlayerHandsSnapshot, TableGroupView};
use crate::errors::{EngineError, NotFoundKind};

/// Which partition a card sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandPartition {
    Free,
    Bank,
    Table,
}

/// One player's three partitions. Only reachable through [`HandStore`].
#[derive(Debug, Default)]
pub struct PlayerHands {
    free: Vec<Card>,
    bank: Vec<Card>,
    table: BTreeMap<PropertyColor, Vec<Card>>,
}

impl PlayerHands {
    pub fn free(&self) -> &[Card] {
        &self.free
    }

    pub fn bank(&self) -> &[Card] {
        &self.bank
    }

    pub fn table(&self) -> &BTreeMap<PropertyColor, Vec<Card>> {
        &self.table
    }

    pub fn group(&self, color: PropertyColor) -> Option<&[Card]> {
        self.table.get(&color).map(|g| g.as_slice())
    }

    pub fn require_group(&self, color: PropertyColor) -> Result<&[Card], EngineError> {
        self.group(color).ok_or_else(|| {
            EngineError::not_found(NotFoundKind::ColorGroup, format!("no {color:?} group"))
        })
    }

    pub fn add_free(&mut self, card: Card) {
        self.free.push(card);
    }

    pub fn add_bank(&mut self, card: Card) {
        self.bank.push(card);
    }

    pub fn add_to_table(&mut self, color: PropertyColor, card: Card) {
        self.table.entry(color).or_default().push(card);
    }

    fn remove_from(cards: &mut Vec<Card>, card_id: CardId) -> Option<Card> {
        cards
            .iter()
            .position(|c| c.id == card_id)
            .map(|pos| cards.remove(pos))
    }

    pub fn remove_free(&mut self, card_id: CardId) -> Result<Card, EngineError> {
        Self::remove_from(&mut self.free, card_id).ok_or_else(|| {
            EngineError::not_found(NotFoundKind::Card, format!("{card_id} not in free hand"))
        })
    }

    pub fn remove_bank(&mut self, card_id: CardId) -> Result<Card, EngineError> {
        Self::remove_from(&mut self.bank, card_id).ok_or_else(|| {
            EngineError::not_found(NotFoundKind::Card, format!("{card_id} not in bank hand"))
        })
    }

    /// Remove a card from whichever color group holds it. The emptied group
    /// entry is deleted; no zero-length groups persist.
    pub fn remove_from_table(
        &mut self,
        card_id: CardId,
    ) -> Result<(PropertyColor, Card), EngineError> {
        let not_found = || {
            EngineError::not_found(NotFoundKind::Card, format!("{card_id} not in table hand"))
        };
        let color = self
            .table
            .iter()
            .find(|(_, group)| group.iter().any(|c| c.id == card_id))
            .map(|(color, _)| *color)
            .ok_or_else(not_found)?;

        let group = self.table.get_mut(&color).ok_or_else(not_found)?;
        let card = Self::remove_from(group, card_id).ok_or_else(not_found)?;
        if group.is_empty() {
            self.table.remove(&color);
        }
        Ok((color, card))
    }

    /// Detach an entire color group.
    pub fn take_group(&mut self, color: PropertyColor) -> Result<Vec<Card>, EngineError> {
        self.table.remove(&color).ok_or_else(|| {
            EngineError::not_found(NotFoundKind::ColorGroup, format!("no {color:?} group"))
        })
    }

    /// Locate a card for payment purposes: bank hand first, then table hand.
    pub fn find_card_partition(&self, card_id: CardId) -> Result<HandPartition, EngineError> {
        if self.bank.iter().any(|c| c.id == card_id) {
            return Ok(HandPartition::Bank);
        }
        if self
            .table
            .values()
            .any(|group| group.iter().any(|c| c.id == card_id))
        {
            return Ok(HandPartition::Table);
        }
        Err(EngineError::not_found(
            NotFoundKind::Card,
            format!("{card_id} not in bank or table hand"),
        ))
    }

    /// Borrow a card sitting anywhere in the table hand.
    pub fn table_card(&self, card_id: CardId) -> Result<&Card, EngineError> {
        self.table
            .values()
            .flat_map(|group| group.iter())
            .find(|c| c.id == card_id)
            .ok_or_else(|| {
                EngineError::not_found(NotFoundKind::Card, format!("{card_id} not in table hand"))
            })
    }

    /// Locate a card a demand can reach: bank hand first, then table hand.
    pub fn payment_card(&self, card_id: CardId) -> Result<&Card, EngineError> {
        if let Some(card) = self.bank.iter().find(|c| c.id == card_id) {
            return Ok(card);
        }
        self.table
            .values()
            .flat_map(|group| group.iter())
            .find(|c| c.id == card_id)
            .ok_or_else(|| {
                EngineError::not_found(
                    NotFoundKind::Card,
                    format!("{card_id} not in bank or table hand"),
                )
            })
    }

    /// Total value of a proposed payment, validating that every card is
    /// reachable and listed once.
    pub fn payment_value_of(&self, card_ids: &[CardId]) -> Result<u32, EngineError> {
        let mut seen = std::collections::HashSet::new();
        let mut total = 0;
        for &id in card_ids {
            if !seen.insert(id) {
                return Err(EngineError::invariant(format!(
                    "card {id} listed twice in one payment"
                )));
            }
            total += self.payment_card(id)?.bank_value;
        }
        Ok(total)
    }

    /// Combined value of bank and table holdings (what a demand can reach).
    pub fn holdings_total(&self) -> u32 {
        let bank: u32 = self.bank.iter().map(|c| c.bank_value).sum();
        let table: u32 = self
            .table
            .values()
            .flat_map(|g| g.iter())
            .map(|c| c.bank_value)
            .sum();
        bank + table
    }

    pub fn complete_set_count(&self) -> usize {
        self.table
            .iter()
            .filter(|(color, group)| rules::is_set_complete(**color, group))
            .count()
    }

    pub fn snapshot(&self, player: PlayerId) -> PlayerHandsSnapshot {
        PlayerHandsSnapshot {
            player,
            free_hand: self.free.iter().map(CardView::from).collect(),
            bank: self.bank.iter().map(CardView::from).collect(),
            table: self
                .table
                .iter()
                .map(|(color, group)| TableGroupView::from_group(*color, group))
                .collect(),
            bank_total: self.bank.iter().map(|c| c.bank_value).sum(),
        }
    }

    /// Ids across all three partitions. Conservation checks only.
    pub fn card_ids(&self) -> Vec<CardId> {
        self.free
            .iter()
            .chain(self.bank.iter())
            .chain(self.table.values().flat_map(|g| g.iter()))
            .map(|c| c.id)
            .collect()
    }
}

/// All players' hands for one room.
#[derive(Debug, Default)]
pub struct HandStore {
    players: DashMap<PlayerId, Arc<Mutex<PlayerHands>>>,
}

impl HandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_player(&self, player: PlayerId) {
        self.players
            .entry(player)
            .or_insert_with(|| Arc::new(Mutex::new(PlayerHands::default())));
    }

    pub fn remove_player(&self, player: PlayerId) -> Option<Arc<Mutex<PlayerHands>>> {
        self.players.remove(&player).map(|(_, hands)| hands)
    }

    /// Clone the player's lock handle out of the map so the map shard lock is
    /// not held while the hand lock is.
    fn handle(&self, player: PlayerId) -> Result<Arc<Mutex<PlayerHands>>, EngineError> {
        self.players
            .get(&player)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                EngineError::not_found(NotFoundKind::Player, format!("player {player} has no hands"))
            })
    }

    /// Run `f` under the player's exclusive hand lock.
    pub fn with_hands<R>(
        &self,
        player: PlayerId,
        f: impl FnOnce(&mut PlayerHands) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        let handle = self.handle(player)?;
        let mut hands = handle.lock();
        f(&mut hands)
    }

    /// Run `f` under both players' locks, acquired in ascending id order.
    /// `f` receives the hands in argument order (`a`, then `b`).
    pub fn with_two<R>(
        &self,
        a: PlayerId,
        b: PlayerId,
        f: impl FnOnce(&mut PlayerHands, &mut PlayerHands) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        if a == b {
            return Err(EngineError::invariant(
                "two-player hand operation addressed a single player",
            ));
        }
        let handle_a = self.handle(a)?;
        let handle_b = self.handle(b)?;

        if a < b {
            let mut hands_a = handle_a.lock();
            let mut hands_b = handle_b.lock();
            f(&mut hands_a, &mut hands_b)
        } else {
            let mut hands_b = handle_b.lock();
            let mut hands_a = handle_a.lock();
            f(&mut hands_a, &mut hands_b)
        }
    }

    pub fn snapshot(&self, player: PlayerId) -> Result<PlayerHandsSnapshot, EngineError> {
        self.with_hands(player, |hands| Ok(hands.snapshot(player)))
    }

    /// Ids of every card held by any player. Conservation checks only.
    pub fn card_ids(&self) -> Vec<CardId> {
        let mut ids = Vec::new();
        for entry in self.players.iter() {
            ids.extend(entry.value().lock().card_ids());
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;

    const COLOR: PropertyColor = PropertyColor::Amber;

    #[test]
    fn payment_lookup_tries_bank_before_table() {
        let mut hands = PlayerHands::default();
        let bank_card = fixtures::money(3);
        let table_card = fixtures::property("a", COLOR);
        let bank_id = bank_card.id;
        let table_id = table_card.id;
        hands.add_bank(bank_card);
        hands.add_to_table(COLOR, table_card);

        assert_eq!(hands.find_card_partition(bank_id).unwrap(), HandPartition::Bank);
        assert_eq!(
            hands.find_card_partition(table_id).unwrap(),
            HandPartition::Table
        );
        assert!(hands.find_card_partition(CardId::fresh()).is_err());
    }

    #[test]
    fn removing_last_table_card_deletes_the_group() {
        let mut hands = PlayerHands::default();
        let card = fixtures::property("a", COLOR);
        let id = card.id;
        hands.add_to_table(COLOR, card);

        let (color, removed) = hands.remove_from_table(id).unwrap();
        assert_eq!(color, COLOR);
        assert_eq!(removed.id, id);
        assert!(hands.group(COLOR).is_none());
    }

    #[test]
    fn take_group_detaches_everything_at_once() {
        let mut hands = PlayerHands::default();
        hands.add_to_table(COLOR, fixtures::property("a", COLOR));
        hands.add_to_table(COLOR, fixtures::property("b", COLOR));

        let group = hands.take_group(COLOR).unwrap();
        assert_eq!(group.len(), 2);
        assert!(hands.group(COLOR).is_none());
        assert!(hands.take_group(COLOR).is_err());
    }

    #[test]
    fn holdings_total_spans_bank_and_table() {
        let mut hands = PlayerHands::default();
        hands.add_bank(fixtures::money(5));
        hands.add_to_table(COLOR, fixtures::property("a", COLOR)); // value 2
        hands.add_free(fixtures::money(9)); // free hand is out of reach

        assert_eq!(hands.holdings_total(), 7);
    }

    #[test]
    fn with_two_gives_hands_in_argument_order() {
        let store = HandStore::new();
        let a = PlayerId::fresh();
        let b = PlayerId::fresh();
        store.register_player(a);
        store.register_player(b);

        store
            .with_hands(a, |hands| {
                hands.add_bank(fixtures::money(1));
                Ok(())
            })
            .unwrap();

        store
            .with_two(a, b, |hands_a, hands_b| {
                assert_eq!(hands_a.bank().len(), 1);
                assert_eq!(hands_b.bank().len(), 0);
                Ok(())
            })
            .unwrap();

        // Same result regardless of which argument sorts first.
        store
            .with_two(b, a, |hands_b, hands_a| {
                assert_eq!(hands_a.bank().len(), 1);
                assert_eq!(hands_b.bank().len(), 0);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn with_two_rejects_self_pair() {
        let store = HandStore::new();
        let a = PlayerId::fresh();
        store.register_player(a);
        assert!(store.with_two(a, a, |_, _| Ok(())).is_err());
    }

    #[test]
    fn unknown_player_is_not_found() {
        let store = HandStore::new();
        let err = store.with_hands(PlayerId::fresh(), |_| Ok(())).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NotFound {
                kind: NotFoundKind::Player,
                ..
            }
        ));
    }
}
