//! Conservation under true parallel mutation: concurrent draws and discards
//! against one room must never lose, duplicate, or double-observe a card.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use engine::domain::cards::CardId;
use engine_test_support::decks;

#[test]
fn concurrent_draw_and_discard_conserves_the_card_set() {
    let t = common::room_with_deck(4, decks::shuffled_deck(0xC0FFEE));
    let expected = common::card_set(&t.room);

    let mut handles = Vec::new();
    for &player in &t.players {
        let room = Arc::clone(&t.room);
        handles.push(thread::spawn(move || {
            let executor = room.executor();
            for round in 0..50 {
                let drawn = executor.draw_cards(player, 1 + round % 3).unwrap();
                // Cycle most of what we drew straight back through the
                // discard pile so reshuffles keep firing.
                for id in drawn {
                    executor.discard_and_refill_if_empty(player, id).unwrap();
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    common::assert_conserved(&t.room, &expected);
}

#[test]
fn concurrent_cross_player_payments_conserve_the_card_set() {
    let t = common::room_with_deck(4, vec![]);
    let players = t.players.clone();

    // Seed every player's bank with distinct coins.
    let mut all: HashSet<CardId> = HashSet::new();
    for (i, &player) in players.iter().enumerate() {
        for v in 0..10u32 {
            all.insert(common::give_bank(
                &t.room,
                player,
                decks::money(i as u32 * 100 + v),
            ));
        }
    }
    let expected = common::card_set(&t.room);
    assert_eq!(expected, all);

    // Each thread repeatedly pays its neighbor one of whatever it holds.
    let mut handles = Vec::new();
    for (i, &payer) in players.iter().enumerate() {
        let beneficiary = players[(i + 1) % players.len()];
        let room = Arc::clone(&t.room);
        handles.push(thread::spawn(move || {
            let executor = room.executor();
            for _ in 0..100 {
                let first = room
                    .hands()
                    .with_hands(payer, |hands| Ok(hands.bank().first().map(|c| c.id)))
                    .unwrap();
                if let Some(id) = first {
                    // A racing neighbor payment cannot take bank cards, but
                    // tolerate disappearance anyway.
                    let _ = executor.transfer_payment(payer, beneficiary, &[id]);
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    common::assert_conserved(&t.room, &expected);
}

#[test]
fn draw_underflow_reshuffles_without_loss_under_contention() {
    // A tiny deck forces constant reshuffling while four threads churn.
    let deck: Vec<_> = (0..6).map(|v| decks::money(v + 1)).collect();
    let t = common::room_with_deck(4, deck);
    let expected = common::card_set(&t.room);

    let mut handles = Vec::new();
    for &player in &t.players {
        let room = Arc::clone(&t.room);
        handles.push(thread::spawn(move || {
            let executor = room.executor();
            for _ in 0..100 {
                for id in executor.draw_cards(player, 2).unwrap() {
                    executor.discard_and_refill_if_empty(player, id).unwrap();
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    common::assert_conserved(&t.room, &expected);
}
