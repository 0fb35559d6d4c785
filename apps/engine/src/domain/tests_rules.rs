use crate::domain::fixtures;
use crate::domain::cards::{BuildingTier, CardId, CommandKind, PropertyColor};
use crate::domain::rules::{
    ensure_buildable, ensure_payment_covers, ensure_raid_target, ensure_takeover_target,
    ensure_trade_offer, find_shield, is_set_complete, payment_total, property_count,
};
use crate::errors::{EngineError, NotFoundKind, RuleKind};

const TWO_SET: PropertyColor = PropertyColor::Coral; // set size 2
const THREE_SET: PropertyColor = PropertyColor::Emerald; // set size 3

fn rule_kind(err: EngineError) -> RuleKind {
    match err {
        EngineError::Rule { kind, .. } => kind,
        other => panic!("expected rule violation, got {other:?}"),
    }
}

#[test]
fn set_completion_counts_properties_and_wildcards_only() {
    let mut group = vec![fixtures::property("a", TWO_SET)];
    assert!(!is_set_complete(TWO_SET, &group));

    group.push(fixtures::command(CommandKind::BuildHouse { bonus: 3 }));
    assert_eq!(property_count(&group), 1);
    assert!(!is_set_complete(TWO_SET, &group));

    group.push(fixtures::wildcard_any());
    assert!(is_set_complete(TWO_SET, &group));
}

#[test]
fn raid_rejects_completed_set() {
    let group = vec![
        fixtures::property("a", TWO_SET),
        fixtures::property("b", TWO_SET),
    ];
    let err = ensure_raid_target(TWO_SET, &group, group[0].id).unwrap_err();
    assert_eq!(rule_kind(err), RuleKind::CompleteSetImmune);
}

#[test]
fn raid_rejects_buildings() {
    let house = fixtures::command(CommandKind::BuildHouse { bonus: 3 });
    let group = vec![fixtures::property("a", THREE_SET), house.clone()];
    let err = ensure_raid_target(THREE_SET, &group, house.id).unwrap_err();
    assert_eq!(rule_kind(err), RuleKind::BuildingNotRaidable);
}

#[test]
fn raid_rejects_card_absent_from_group() {
    let group = vec![fixtures::property("a", THREE_SET)];
    let err = ensure_raid_target(THREE_SET, &group, CardId::fresh()).unwrap_err();
    assert!(matches!(
        err,
        EngineError::NotFound {
            kind: NotFoundKind::Card,
            ..
        }
    ));
}

#[test]
fn raid_accepts_card_in_incomplete_set() {
    let group = vec![
        fixtures::property("a", THREE_SET),
        fixtures::property("b", THREE_SET),
    ];
    assert!(ensure_raid_target(THREE_SET, &group, group[1].id).is_ok());
}

#[test]
fn takeover_requires_completed_set() {
    let mut group = vec![
        fixtures::property("a", THREE_SET),
        fixtures::property("b", THREE_SET),
    ];
    let err = ensure_takeover_target(THREE_SET, &group).unwrap_err();
    assert_eq!(rule_kind(err), RuleKind::CompleteSetRequired);

    group.push(fixtures::property("c", THREE_SET));
    assert!(ensure_takeover_target(THREE_SET, &group).is_ok());
}

#[test]
fn building_requires_completed_set() {
    let group = vec![fixtures::property("a", THREE_SET)];
    let err = ensure_buildable(THREE_SET, &group, BuildingTier::House).unwrap_err();
    assert_eq!(rule_kind(err), RuleKind::CompleteSetRequired);
}

#[test]
fn hotel_requires_house_first() {
    let group = vec![
        fixtures::property("a", TWO_SET),
        fixtures::property("b", TWO_SET),
    ];
    let err = ensure_buildable(TWO_SET, &group, BuildingTier::Hotel).unwrap_err();
    assert_eq!(rule_kind(err), RuleKind::BuildingOrder);
}

#[test]
fn duplicate_building_tier_rejected() {
    let group = vec![
        fixtures::property("a", TWO_SET),
        fixtures::property("b", TWO_SET),
        fixtures::command(CommandKind::BuildHouse { bonus: 3 }),
    ];
    let err = ensure_buildable(TWO_SET, &group, BuildingTier::House).unwrap_err();
    assert_eq!(rule_kind(err), RuleKind::DuplicateBuilding);

    // Hotel on top of the house is fine.
    assert!(ensure_buildable(TWO_SET, &group, BuildingTier::Hotel).is_ok());
}

#[test]
fn trade_offer_cannot_break_built_up_set() {
    let group = vec![
        fixtures::property("a", TWO_SET),
        fixtures::property("b", TWO_SET),
        fixtures::command(CommandKind::BuildHouse { bonus: 3 }),
    ];
    let err = ensure_trade_offer(TWO_SET, &group, group[0].id).unwrap_err();
    assert_eq!(rule_kind(err), RuleKind::CompleteSetImmune);
}

#[test]
fn trade_offer_from_plain_complete_set_is_legal() {
    let group = vec![
        fixtures::property("a", TWO_SET),
        fixtures::property("b", TWO_SET),
    ];
    assert!(ensure_trade_offer(TWO_SET, &group, group[0].id).is_ok());
}

#[test]
fn payment_uses_card_bank_values() {
    let cards = vec![fixtures::money(5), fixtures::money(1), fixtures::shield()];
    assert_eq!(payment_total(&cards), 5 + 1 + 4);
}

#[test]
fn payment_must_cover_unless_exhausted() {
    // Covers.
    assert!(ensure_payment_covers(7, 7, 20).is_ok());
    assert!(ensure_payment_covers(8, 7, 20).is_ok());

    // Short with holdings remaining.
    let err = ensure_payment_covers(3, 7, 20).unwrap_err();
    assert_eq!(rule_kind(err), RuleKind::PaymentShort);

    // Short but wiped out.
    assert!(ensure_payment_covers(3, 7, 3).is_ok());
    assert!(ensure_payment_covers(0, 7, 0).is_ok());
}

#[test]
fn shield_lookup_scans_free_hand() {
    let hand = vec![fixtures::money(1), fixtures::shield(), fixtures::money(2)];
    assert_eq!(find_shield(&hand), Some(hand[1].id));

    let unarmed = vec![fixtures::money(1)];
    assert_eq!(find_shield(&unarmed), None);
}
