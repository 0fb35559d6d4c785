//! Turn sequencing at the service boundary: play budgets, end-of-turn hand
//! limits, turn-start draws, immediate actions, and the embargo lifecycle.

mod common;

use engine::domain::cards::CommandKind;
use engine::errors::{EngineError, RuleKind, StateKind};
use engine::{EngineEvent, PlayDestination};
use engine_test_support::decks;

#[test]
fn play_budget_caps_a_turn_at_three_cards() {
    let t = common::room_with_deck(2, vec![]);
    let p0 = t.players[0];

    let cards: Vec<_> = (0..4)
        .map(|v| common::give_free(&t.room, p0, decks::money(v + 1)))
        .collect();

    for &card in &cards[..3] {
        t.service
            .play_turn_card(&t.room, p0, card, PlayDestination::Bank, None)
            .unwrap();
    }
    let err = t
        .service
        .play_turn_card(&t.room, p0, cards[3], PlayDestination::Bank, None)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rule {
            kind: RuleKind::PlayBudgetExceeded,
            ..
        }
    ));
    assert_eq!(common::bank_len(&t.room, p0), 3);
}

#[test]
fn out_of_turn_plays_are_rejected() {
    let t = common::room_with_deck(2, vec![]);
    let p1 = t.players[1];
    let card = common::give_free(&t.room, p1, decks::money(1));

    let err = t
        .service
        .play_turn_card(&t.room, p1, card, PlayDestination::Bank, None)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::State {
            kind: StateKind::WrongTurn,
            ..
        }
    ));
}

#[test]
fn end_turn_enforces_the_hand_limit_and_draws_for_the_next_player() {
    let deck: Vec<_> = (0..10).map(|v| decks::money(v + 1)).collect();
    let t = common::room_with_deck(3, deck);
    let (p0, p1, p2) = (t.players[0], t.players[1], t.players[2]);

    // Nine in hand: ending the turn without discarding is over the limit.
    let held: Vec<_> = (0..9)
        .map(|v| common::give_free(&t.room, p0, decks::money(v + 1)))
        .collect();
    common::give_free(&t.room, p1, decks::money(50));

    let err = t.service.end_turn(&t.room, p0, &[]).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rule {
            kind: RuleKind::HandLimitExceeded,
            ..
        }
    ));

    let outcome = t.service.end_turn(&t.room, p0, &held[..2]).unwrap();
    assert_eq!(common::free_len(&t.room, p0), 7);
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        EngineEvent::TurnEnded { next_player, .. } if *next_player == p1
    )));
    // The next player held a card, so they draw the standard two.
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        EngineEvent::CardsDrawn { player, count: 2 } if *player == p1
    )));
    assert_eq!(common::free_len(&t.room, p1), 3);

    // An empty hand draws the full refill instead.
    let outcome = t.service.end_turn(&t.room, p1, &[]).unwrap();
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        EngineEvent::CardsDrawn { player, count: 5 } if *player == p2
    )));
    assert_eq!(common::free_len(&t.room, p2), 5);
}

#[test]
fn draw_two_resolves_inline_and_spends_the_card() {
    let deck: Vec<_> = (0..4).map(|v| decks::money(v + 1)).collect();
    let t = common::room_with_deck(2, deck);
    let p0 = t.players[0];

    let draw_two = common::give_free(&t.room, p0, decks::command(CommandKind::DrawTwo));
    let expected = common::card_set(&t.room);

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, draw_two, PlayDestination::Action, None)
        .unwrap();
    assert!(outcome.dialog.is_none(), "draw-two needs no responses");
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        EngineEvent::CardsDrawn { player, count: 2 } if *player == p0
    )));

    assert_eq!(common::free_len(&t.room, p0), 2);
    assert_eq!(t.room.deck().draw_len(), 2);
    // The spent command card tops the discard pile.
    assert_eq!(t.room.deck().peek_last_discard().unwrap().id, draw_two);
    common::assert_conserved(&t.room, &expected);
}

#[test]
fn embargo_blocks_trades_until_the_issuer_turn_returns() {
    let deck: Vec<_> = (0..30).map(|v| decks::money(v + 1)).collect();
    let t = common::room_with_deck(3, deck);
    let (p0, p1, p2) = (t.players[0], t.players[1], t.players[2]);

    // p0 embargoes p1.
    let embargo = common::give_free(&t.room, p0, decks::command(CommandKind::TradeEmbargo));
    let outcome = t
        .service
        .play_turn_card(&t.room, p0, embargo, PlayDestination::Action, None)
        .unwrap();
    let mut ctx = outcome.dialog.unwrap().context;
    ctx.target_player = Some(p1);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();
    assert!(outcome.action_resolved);
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        EngineEvent::EmbargoImposed { target, .. } if *target == p1
    )));

    // On p1's turn, initiating a trade fails while embargoed.
    t.service.end_turn(&t.room, p0, &[]).unwrap();
    let trade = common::give_free(&t.room, p1, decks::command(CommandKind::ForcedTrade));
    let err = t
        .service
        .play_turn_card(&t.room, p1, trade, PlayDestination::Action, None)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rule {
            kind: RuleKind::Embargoed,
            ..
        }
    ));

    // Rotate back around: the embargo expires when p0's turn begins.
    t.service.end_turn(&t.room, p1, &[]).unwrap();
    t.service.end_turn(&t.room, p2, &[]).unwrap();
    t.service.end_turn(&t.room, p0, &[]).unwrap();

    let outcome = t
        .service
        .play_turn_card(&t.room, p1, trade, PlayDestination::Action, None)
        .unwrap();
    assert!(outcome.dialog.is_some(), "embargo lifted, trade opens dialog");
}

#[test]
fn responses_are_not_turn_plays() {
    // A defender answering a dialog must not consume their own play budget.
    let t = common::room_with_deck(2, vec![]);
    let (p0, p1) = (t.players[0], t.players[1]);

    let levy = common::give_free(&t.room, p0, decks::command(CommandKind::Levy { amount: 3 }));
    let coin = common::give_bank(&t.room, p1, decks::money(5));

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, levy, PlayDestination::Action, None)
        .unwrap();
    let mut ctx = outcome.dialog.unwrap().context;
    ctx.target_player = Some(p1);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();

    let mut pay = outcome.dialogs[0].context.clone();
    pay.chosen_cards = vec![coin];
    let outcome = t.service.register_action_response(&t.room, p1, pay).unwrap();
    assert!(outcome.action_resolved);
    assert_eq!(common::bank_len(&t.room, p0), 1);

    // p0 still has two plays left this turn.
    let a = common::give_free(&t.room, p0, decks::money(1));
    let b = common::give_free(&t.room, p0, decks::money(2));
    t.service
        .play_turn_card(&t.room, p0, a, PlayDestination::Bank, None)
        .unwrap();
    t.service
        .play_turn_card(&t.room, p0, b, PlayDestination::Bank, None)
        .unwrap();
}
