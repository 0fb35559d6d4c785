//! Shared harness for engine integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use engine::domain::cards::{Card, CardId, PlayerId, PropertyColor};
use engine::{GameFlowService, Player, Room, RoomConfig};

pub fn init() {
    engine_test_support::logging::init();
}

pub struct TestRoom {
    pub room: Arc<Room>,
    pub service: GameFlowService,
    pub players: Vec<PlayerId>,
}

pub fn room_with_deck(player_count: usize, deck: Vec<Card>) -> TestRoom {
    init();
    let players: Vec<Player> = (0..player_count)
        .map(|i| Player::new(format!("player-{i}")))
        .collect();
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let room = Room::new(RoomConfig::new([9u8; 32]), players, deck).unwrap();
    TestRoom {
        room: Arc::new(room),
        service: GameFlowService::new(),
        players: ids,
    }
}

pub fn give_free(room: &Room, player: PlayerId, card: Card) -> CardId {
    let id = card.id;
    room.hands()
        .with_hands(player, |hands| {
            hands.add_free(card);
            Ok(())
        })
        .unwrap();
    id
}

pub fn give_bank(room: &Room, player: PlayerId, card: Card) -> CardId {
    let id = card.id;
    room.hands()
        .with_hands(player, |hands| {
            hands.add_bank(card);
            Ok(())
        })
        .unwrap();
    id
}

pub fn give_table(room: &Room, player: PlayerId, color: PropertyColor, card: Card) -> CardId {
    let id = card.id;
    room.hands()
        .with_hands(player, |hands| {
            hands.add_to_table(color, card);
            Ok(())
        })
        .unwrap();
    id
}

pub fn free_len(room: &Room, player: PlayerId) -> usize {
    room.hands()
        .with_hands(player, |hands| Ok(hands.free().len()))
        .unwrap()
}

pub fn bank_len(room: &Room, player: PlayerId) -> usize {
    room.hands()
        .with_hands(player, |hands| Ok(hands.bank().len()))
        .unwrap()
}

pub fn group_ids(room: &Room, player: PlayerId, color: PropertyColor) -> Option<Vec<CardId>> {
    room.hands()
        .with_hands(player, |hands| {
            Ok(hands
                .group(color)
                .map(|group| group.iter().map(|c| c.id).collect()))
        })
        .unwrap()
}

pub fn free_contains(room: &Room, player: PlayerId, card: CardId) -> bool {
    room.hands()
        .with_hands(player, |hands| {
            Ok(hands.free().iter().any(|c| c.id == card))
        })
        .unwrap()
}

/// Snapshot the room's full card-id set for later conservation checks.
pub fn card_set(room: &Room) -> HashSet<CardId> {
    let ids = room.card_ids();
    let set: HashSet<CardId> = ids.iter().copied().collect();
    assert_eq!(set.len(), ids.len(), "a card is in two places at once");
    set
}

/// The multiset of card ids across piles and hands never changes.
pub fn assert_conserved(room: &Room, expected: &HashSet<CardId>) {
    assert_eq!(&card_set(room), expected, "card set changed");
}
