use crate::domain::fixtures;
use crate::domain::cards::{CommandKind, PropertyColor};
use crate::domain::rules::calculate_rent;
use crate::errors::{EngineError, RuleKind};

const COLOR: PropertyColor = PropertyColor::Cobalt;

#[test]
fn rent_uses_tier_for_property_count() {
    let group = vec![
        fixtures::property_with_tiers("First Dock", COLOR, &[2, 4, 7]),
        fixtures::property_with_tiers("Second Dock", COLOR, &[2, 4, 7]),
    ];
    assert_eq!(calculate_rent(COLOR, &group).unwrap(), 4);
}

#[test]
fn rent_single_card_uses_first_tier() {
    let group = vec![fixtures::property_with_tiers("Dock", COLOR, &[2, 4, 7])];
    assert_eq!(calculate_rent(COLOR, &group).unwrap(), 2);
}

#[test]
fn building_adds_flat_bonus_on_top() {
    let mut group = vec![
        fixtures::property_with_tiers("a", COLOR, &[2, 4, 7]),
        fixtures::property_with_tiers("b", COLOR, &[2, 4, 7]),
    ];
    group.push(fixtures::command(CommandKind::BuildHouse { bonus: 3 }));
    assert_eq!(calculate_rent(COLOR, &group).unwrap(), 4 + 3);

    group.push(fixtures::command(CommandKind::BuildHotel { bonus: 4 }));
    assert_eq!(calculate_rent(COLOR, &group).unwrap(), 4 + 3 + 4);
}

#[test]
fn wildcard_counts_toward_the_tier() {
    let group = vec![
        fixtures::property_with_tiers("a", COLOR, &[2, 4, 7]),
        fixtures::wildcard_any(),
    ];
    assert_eq!(calculate_rent(COLOR, &group).unwrap(), 4);
}

#[test]
fn tier_index_clamps_at_table_length() {
    // Four set-counting cards against a three-entry tier table.
    let group = vec![
        fixtures::property_with_tiers("a", COLOR, &[2, 4, 7]),
        fixtures::property_with_tiers("b", COLOR, &[2, 4, 7]),
        fixtures::property_with_tiers("c", COLOR, &[2, 4, 7]),
        fixtures::wildcard_any(),
    ];
    assert_eq!(calculate_rent(COLOR, &group).unwrap(), 7);
}

#[test]
fn wildcards_alone_cannot_anchor_rent() {
    let group = vec![fixtures::wildcard_any(), fixtures::wildcard_any()];
    let err = calculate_rent(COLOR, &group).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rule {
            kind: RuleKind::InvalidRentTarget,
            ..
        }
    ));
}

#[test]
fn empty_group_cannot_anchor_rent() {
    let err = calculate_rent(COLOR, &[]).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Rule {
            kind: RuleKind::InvalidRentTarget,
            ..
        }
    ));
}
