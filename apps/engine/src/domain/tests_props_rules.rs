//! Property-based tests for the stateless rule evaluator.

use proptest::prelude::*;

use crate::domain::fixtures;
use crate::domain::action::DialogStage;
use crate::domain::cards::{Card, PlayerId, PropertyColor};
use crate::domain::rules::{
    calculate_rent, identify_dialog_audience, is_set_complete, payment_total,
};

fn color() -> impl Strategy<Value = PropertyColor> {
    (0usize..PropertyColor::ALL.len()).prop_map(|i| PropertyColor::ALL[i])
}

fn stage() -> impl Strategy<Value = DialogStage> {
    prop_oneof![
        Just(DialogStage::PlayerSelection),
        Just(DialogStage::PropertySetSelection),
        Just(DialogStage::TableHandSelection),
        Just(DialogStage::OwnHandSelection),
        Just(DialogStage::WildcardColorSelection),
        Just(DialogStage::PayValue),
        Just(DialogStage::ShieldsUp),
    ]
}

/// Nondecreasing tier table of length 1..=4.
fn tier_table() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(1u32..20, 1..=4).prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

fn group_of(color: PropertyColor, tiers: &[u32], properties: usize, wildcards: usize) -> Vec<Card> {
    let mut group = Vec::new();
    for i in 0..properties {
        group.push(fixtures::property_with_tiers(&format!("p{i}"), color, tiers));
    }
    for _ in 0..wildcards {
        group.push(fixtures::wildcard_any());
    }
    group
}

proptest! {
    /// Adding a set-counting card never un-completes a set.
    #[test]
    fn prop_completion_is_monotone(
        color in color(),
        tiers in tier_table(),
        properties in 1usize..4,
        wildcards in 0usize..3,
    ) {
        let mut group = group_of(color, &tiers, properties, wildcards);
        let before = is_set_complete(color, &group);
        group.push(fixtures::wildcard_any());
        if before {
            prop_assert!(is_set_complete(color, &group));
        }
    }

    /// Rent grows (weakly) with the number of set-counting cards and always
    /// comes from the anchor's tier table.
    #[test]
    fn prop_rent_is_monotone_in_property_count(
        color in color(),
        tiers in tier_table(),
        properties in 1usize..4,
        wildcards in 0usize..3,
    ) {
        let smaller = group_of(color, &tiers, properties, wildcards);
        let larger = group_of(color, &tiers, properties, wildcards + 1);

        let rent_small = calculate_rent(color, &smaller).unwrap();
        let rent_large = calculate_rent(color, &larger).unwrap();

        prop_assert!(rent_small <= rent_large);
        prop_assert!(tiers.contains(&rent_small));
    }

    /// Payment totals are plain sums of bank values.
    #[test]
    fn prop_payment_total_is_sum(values in proptest::collection::vec(0u32..50, 0..8)) {
        let cards: Vec<Card> = values.iter().map(|v| fixtures::money(*v)).collect();
        prop_assert_eq!(payment_total(&cards), values.iter().sum::<u32>());
    }

    /// Audience resolution is total over every stage except a defender-less
    /// shields-up, and the caller is never in a pay-everyone audience.
    #[test]
    fn prop_audience_totality(stage in stage(), roster_size in 2usize..6, with_target in any::<bool>()) {
        let players: Vec<PlayerId> = (0..roster_size).map(|_| PlayerId::fresh()).collect();
        let caller = players[0];
        let target = if with_target { Some(players[roster_size - 1]) } else { None };

        let result = identify_dialog_audience(caller, target, &players, stage);
        match stage {
            DialogStage::ShieldsUp if target.is_none() => prop_assert!(result.is_err()),
            DialogStage::PayValue if target.is_none() => {
                let audience = result.unwrap();
                prop_assert_eq!(audience.len(), roster_size - 1);
                prop_assert!(!audience.contains(&caller));
            }
            _ => {
                let audience = result.unwrap();
                prop_assert!(!audience.is_empty());
            }
        }
    }
}
