//! Multi-payer tribute flows: rent assessment, arrival-order draining,
//! resolution gating, and payment validation.

mod common;

use engine::domain::cards::PropertyColor;
use engine::errors::{EngineError, RuleKind};
use engine::{ActionKind, DialogStage, EngineEvent, PlayDestination};
use engine_test_support::decks;

const COLOR: PropertyColor = PropertyColor::Emerald;

#[test]
fn tribute_collects_rent_from_every_other_player() {
    let t = common::room_with_deck(3, vec![]);
    let (p0, p1, p2) = (t.players[0], t.players[1], t.players[2]);

    // Two same-color properties against tiers [2,4,7]: rent is 4.
    let tribute = common::give_free(
        &t.room,
        p0,
        decks::tribute(&[COLOR, PropertyColor::Amber]),
    );
    common::give_table(&t.room, p0, COLOR, decks::property("e1", COLOR));
    common::give_table(&t.room, p0, COLOR, decks::property("e2", COLOR));

    let p1_three = common::give_bank(&t.room, p1, decks::money(3));
    let p1_two = common::give_bank(&t.room, p1, decks::money(2));
    // p2 has nothing reachable: an empty payment is legal (wiped out).
    let expected = common::card_set(&t.room);

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, tribute, PlayDestination::Action, None)
        .unwrap();
    let dialog = outcome.dialog.unwrap();
    assert_eq!(dialog.context.stage, DialogStage::PropertySetSelection);

    // Choose which of the initiator's sets to charge rent on.
    let mut ctx = dialog.context;
    ctx.chosen_color = Some(COLOR);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();
    let pay = &outcome.dialogs[0];
    assert_eq!(pay.context.stage, DialogStage::PayValue);
    assert_eq!(pay.context.payment_value, Some(4));
    assert_eq!(pay.audience.len(), 2);
    assert!(pay.audience.contains(&p1) && pay.audience.contains(&p2));

    // A short payment with holdings remaining is queued, and the violation
    // surfaces when the inbox drains.
    let mut short = pay.context.clone();
    short.chosen_cards = vec![p1_three];
    let outcome = t
        .service
        .register_action_response(&t.room, p1, short)
        .unwrap();
    assert!(!outcome.action_resolved, "gated until every payer responds");

    let mut wiped = pay.context.clone();
    wiped.chosen_cards = Vec::new();
    let err = t
        .service
        .register_action_response(&t.room, p2, wiped.clone())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rule {
            kind: RuleKind::PaymentShort,
            ..
        }
    ));

    // The offender resubmits a covering payment; the restored responses and
    // the fresh one drain together and the action resolves.
    let mut covering = pay.context.clone();
    covering.chosen_cards = vec![p1_three, p1_two];
    let outcome = t
        .service
        .register_action_response(&t.room, p1, covering)
        .unwrap();
    assert!(outcome.action_resolved);

    let payments: Vec<_> = outcome
        .events
        .iter()
        .filter(|e| matches!(e, EngineEvent::ActionResolved { kind: ActionKind::Tribute, .. }))
        .collect();
    assert_eq!(payments.len(), 2);

    assert_eq!(common::bank_len(&t.room, p0), 2);
    assert_eq!(common::bank_len(&t.room, p1), 0);
    common::assert_conserved(&t.room, &expected);
}

#[test]
fn tribute_needs_an_eligible_anchored_group() {
    let t = common::room_with_deck(2, vec![]);
    let p0 = t.players[0];

    // Eligible color, but the group holds only a wildcard: no rent anchor.
    let tribute = common::give_free(&t.room, p0, decks::tribute(&[COLOR]));
    common::give_table(&t.room, p0, COLOR, decks::wildcard_any());

    let err = t
        .service
        .play_turn_card(&t.room, p0, tribute, PlayDestination::Action, None)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rule {
            kind: RuleKind::InvalidRentTarget,
            ..
        }
    ));
}

#[test]
fn tribute_rejects_a_color_outside_the_card_scope() {
    let t = common::room_with_deck(2, vec![]);
    let p0 = t.players[0];

    let tribute = common::give_free(&t.room, p0, decks::tribute(&[COLOR]));
    common::give_table(&t.room, p0, COLOR, decks::property("e1", COLOR));
    common::give_table(
        &t.room,
        p0,
        PropertyColor::Coral,
        decks::property("c1", PropertyColor::Coral),
    );

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, tribute, PlayDestination::Action, None)
        .unwrap();
    let mut ctx = outcome.dialog.unwrap().context;
    ctx.chosen_color = Some(PropertyColor::Coral);
    let err = t
        .service
        .register_action_response(&t.room, p0, ctx)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rule {
            kind: RuleKind::InvalidRentTarget,
            ..
        }
    ));
}

#[test]
fn building_bonus_raises_the_assessed_rent() {
    let t = common::room_with_deck(2, vec![]);
    let (p0, p1) = (t.players[0], t.players[1]);

    let tribute = common::give_free(&t.room, p0, decks::tribute(&[COLOR]));
    for i in 0..3 {
        common::give_table(&t.room, p0, COLOR, decks::property(&format!("e{i}"), COLOR));
    }
    common::give_table(
        &t.room,
        p0,
        COLOR,
        decks::command(engine::domain::cards::CommandKind::BuildHouse { bonus: 3 }),
    );
    common::give_bank(&t.room, p1, decks::money(10));

    let outcome = t
        .service
        .play_turn_card(&t.room, p0, tribute, PlayDestination::Action, None)
        .unwrap();
    let mut ctx = outcome.dialog.unwrap().context;
    ctx.chosen_color = Some(COLOR);
    let outcome = t.service.register_action_response(&t.room, p0, ctx).unwrap();

    // Full set (7) plus the house bonus (3).
    assert_eq!(outcome.dialogs[0].context.payment_value, Some(10));
}
