//! End-to-end hostile-takeover flows: multi-stage dialogs, the shield
//! interrupt, and the at-most-one-pending-action guard.

mod common;

use engine::domain::cards::{CommandKind, PropertyColor};
use engine::errors::{EngineError, StateKind};
use engine::{ActionKind, DialogStage, EngineEvent, PlayDestination, ResponseVerdict};
use engine_test_support::decks;

const COLOR: PropertyColor = PropertyColor::Emerald;

#[test]
fn takeover_walks_player_then_set_selection_and_moves_the_group() {
    let t = common::room_with_deck(3, vec![]);
    let (p0, p1) = (t.players[0], t.players[1]);

    let takeover = common::give_free(&t.room, p0, decks::command(CommandKind::HostileTakeover));
    let set: Vec<_> = (0..3)
        .map(|i| {
            common::give_table(
                &t.room,
                p1,
                COLOR,
                decks::property(&format!("e{i}"), COLOR),
            )
        })
        .collect();
    let second = common::give_free(&t.room, p0, decks::command(CommandKind::DrawTwo));
    let expected = common::card_set(&t.room);

    // Play opens the player-selection dialog addressed to the initiator.
    let outcome = t
        .service
        .play_turn_card(&t.room, p0, takeover, PlayDestination::Action, None)
        .unwrap();
    let dialog = outcome.dialog.expect("takeover needs responses");
    assert_eq!(dialog.context.stage, DialogStage::PlayerSelection);
    assert_eq!(dialog.audience, vec![p0]);

    // Only one action may be pending per room.
    let err = t
        .service
        .play_turn_card(&t.room, p0, second, PlayDestination::Action, None)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::State {
            kind: StateKind::ActionAlreadyPending,
            ..
        }
    ));

    // Pick the target.
    let mut ctx = dialog.context;
    ctx.target_player = Some(p1);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();
    assert!(!outcome.action_resolved);
    let dialog = &outcome.dialogs[0];
    assert_eq!(dialog.context.stage, DialogStage::PropertySetSelection);
    assert_eq!(dialog.audience, vec![p0]);

    // Pick the completed set; no shield in the defender's hand, so the
    // takeover executes.
    let mut ctx = dialog.context.clone();
    ctx.chosen_color = Some(COLOR);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();
    assert!(outcome.action_resolved);
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        EngineEvent::ActionResolved {
            kind: ActionKind::HostileTakeover,
            affected: Some(affected),
            cards,
            ..
        } if *affected == p1 && cards.len() == 3
    )));

    // The source group no longer exists; the destination holds all three.
    assert!(common::group_ids(&t.room, p1, COLOR).is_none());
    let stolen = common::group_ids(&t.room, p0, COLOR).unwrap();
    assert_eq!(stolen.len(), 3);
    for id in set {
        assert!(stolen.contains(&id));
    }
    common::assert_conserved(&t.room, &expected);
}

#[test]
fn used_shield_cancels_the_takeover_and_refills_an_emptied_hand() {
    // Deck stocked so the shield discard can refill five.
    let deck: Vec<_> = (0..8).map(|v| decks::money(v + 1)).collect();
    let t = common::room_with_deck(2, deck);
    let (p0, p1) = (t.players[0], t.players[1]);

    let takeover = common::give_free(&t.room, p0, decks::command(CommandKind::HostileTakeover));
    for i in 0..3 {
        common::give_table(&t.room, p1, COLOR, decks::property(&format!("e{i}"), COLOR));
    }
    // The shield is the defender's only hand card.
    let shield = common::give_free(&t.room, p1, decks::shield());
    let expected = common::card_set(&t.room);

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, takeover, PlayDestination::Action, None)
        .unwrap();
    let mut ctx = outcome.dialog.unwrap().context;
    ctx.target_player = Some(p1);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();

    // The defender holds a shield: the flow diverts to shields-up addressed
    // only to them, and nothing has moved yet.
    let mut ctx = outcome.dialogs[0].context.clone();
    ctx.chosen_color = Some(COLOR);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();
    assert!(!outcome.action_resolved);
    let dialog = &outcome.dialogs[0];
    assert_eq!(dialog.context.stage, DialogStage::ShieldsUp);
    assert_eq!(dialog.audience, vec![p1]);
    assert_eq!(common::group_ids(&t.room, p1, COLOR).unwrap().len(), 3);

    // Use the shield: action blocked, table hands untouched, the shield left
    // the hand, and the emptied hand drew exactly five.
    let mut ctx = dialog.context.clone();
    ctx.verdict = Some(ResponseVerdict::UseShield);
    let outcome = t.service.register_action_response(&t.room, p1, ctx).unwrap();
    assert!(outcome.action_resolved);
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        EngineEvent::ActionBlocked { defender, kind: ActionKind::HostileTakeover, .. } if *defender == p1
    )));
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        EngineEvent::HandRefilled { player, count: 5 } if *player == p1
    )));

    assert_eq!(common::group_ids(&t.room, p1, COLOR).unwrap().len(), 3);
    assert!(common::group_ids(&t.room, p0, COLOR).is_none());
    assert!(!common::free_contains(&t.room, p1, shield));
    assert_eq!(common::free_len(&t.room, p1), 5);
    common::assert_conserved(&t.room, &expected);
}

#[test]
fn declined_shield_lets_the_takeover_execute_without_reprompting() {
    let t = common::room_with_deck(2, vec![]);
    let (p0, p1) = (t.players[0], t.players[1]);

    let takeover = common::give_free(&t.room, p0, decks::command(CommandKind::HostileTakeover));
    for i in 0..3 {
        common::give_table(&t.room, p1, COLOR, decks::property(&format!("e{i}"), COLOR));
    }
    let shield = common::give_free(&t.room, p1, decks::shield());

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, takeover, PlayDestination::Action, None)
        .unwrap();
    let mut ctx = outcome.dialog.unwrap().context;
    ctx.target_player = Some(p1);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();
    let mut ctx = outcome.dialogs[0].context.clone();
    ctx.chosen_color = Some(COLOR);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();
    assert_eq!(outcome.dialogs[0].context.stage, DialogStage::ShieldsUp);

    let mut ctx = outcome.dialogs[0].context.clone();
    ctx.verdict = Some(ResponseVerdict::Decline);
    let outcome = t.service.register_action_response(&t.room, p1, ctx).unwrap();

    // Declining re-enters the original transition with interrupts disabled:
    // the takeover resolves instead of prompting again.
    assert!(outcome.action_resolved);
    assert!(common::group_ids(&t.room, p1, COLOR).is_none());
    assert_eq!(common::group_ids(&t.room, p0, COLOR).unwrap().len(), 3);
    // The declined shield stays in hand.
    assert!(common::free_contains(&t.room, p1, shield));
}

#[test]
fn only_the_initiator_may_answer_selection_stages() {
    let t = common::room_with_deck(3, vec![]);
    let (p0, p1, p2) = (t.players[0], t.players[1], t.players[2]);

    let takeover = common::give_free(&t.room, p0, decks::command(CommandKind::HostileTakeover));
    for i in 0..3 {
        common::give_table(&t.room, p1, COLOR, decks::property(&format!("e{i}"), COLOR));
    }

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, takeover, PlayDestination::Action, None)
        .unwrap();
    let mut ctx = outcome.dialog.unwrap().context;
    ctx.target_player = Some(p1);

    let err = t
        .service
        .register_action_response(&t.room, p2, ctx)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::State {
            kind: StateKind::WrongResponder,
            ..
        }
    ));
}

#[test]
fn takeover_of_an_incomplete_set_is_a_rule_violation_and_can_be_retried() {
    let t = common::room_with_deck(2, vec![]);
    let (p0, p1) = (t.players[0], t.players[1]);

    let takeover = common::give_free(&t.room, p0, decks::command(CommandKind::HostileTakeover));
    for i in 0..2 {
        common::give_table(&t.room, p1, COLOR, decks::property(&format!("e{i}"), COLOR));
    }
    let complete: Vec<_> = (0..2)
        .map(|i| {
            common::give_table(
                &t.room,
                p1,
                PropertyColor::Coral,
                decks::property(&format!("c{i}"), PropertyColor::Coral),
            )
        })
        .collect();

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, takeover, PlayDestination::Action, None)
        .unwrap();
    let mut ctx = outcome.dialog.unwrap().context;
    ctx.target_player = Some(p1);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();

    // Two of three Emerald cards: not takeover-able.
    let mut bad = outcome.dialogs[0].context.clone();
    bad.chosen_color = Some(COLOR);
    let err = t
        .service
        .register_action_response(&t.room, p0, bad)
        .unwrap_err();
    assert!(matches!(err, EngineError::Rule { .. }));

    // The dialog is still live; the corrected selection resolves.
    let mut good = outcome.dialogs[0].context.clone();
    good.chosen_color = Some(PropertyColor::Coral);
    let outcome = t
        .service
        .register_action_response(&t.room, p0, good)
        .unwrap();
    assert!(outcome.action_resolved);
    let stolen = common::group_ids(&t.room, p0, PropertyColor::Coral).unwrap();
    assert_eq!(stolen.len(), complete.len());
}
