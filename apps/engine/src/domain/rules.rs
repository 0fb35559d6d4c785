//! Stateless validation and calculation over card collections.
//!
//! Validation functions return a typed, specific error per rule violation so
//! failures carry enough context for client messaging; they never return bare
//! booleans. Nothing here touches shared state: callers pass the collections
//! they already hold under their own locks.

use crate::domain::action::DialogStage;
use crate::domain::cards::{BuildingTier, Card, CardId, PlayerId, PropertyColor};
use crate::errors::{EngineError, NotFoundKind, RuleKind};

/// Cards in a table group that count toward set completion (standard
/// properties and assigned wildcards; buildings do not).
pub fn property_count(group: &[Card]) -> usize {
    group.iter().filter(|c| c.counts_toward_set()).count()
}

pub fn is_set_complete(color: PropertyColor, group: &[Card]) -> bool {
    property_count(group) >= color.set_size()
}

/// Rent owed for one color group.
///
/// The representative standard property card anchors the tier table:
/// `rent_tiers[min(property_count, tiers) - 1]`, plus the flat bonus of each
/// building command card present in the group. A group holding only
/// wildcards cannot anchor rent.
pub fn calculate_rent(color: PropertyColor, group: &[Card]) -> Result<u32, EngineError> {
    let anchor = group
        .iter()
        .find_map(|c| match &c.body {
            crate::domain::cards::CardBody::Property { rent_tiers, .. } => Some(rent_tiers),
            _ => None,
        })
        .ok_or_else(|| {
            EngineError::rule(
                RuleKind::InvalidRentTarget,
                format!("no standard {color:?} property to anchor rent"),
            )
        })?;

    let count = property_count(group);
    let tier = count.min(anchor.len());
    if tier == 0 {
        return Err(EngineError::rule(
            RuleKind::InvalidRentTarget,
            format!("empty {color:?} group cannot be rented"),
        ));
    }
    let base = anchor[tier - 1];

    let bonus: u32 = group
        .iter()
        .filter_map(|c| c.command_kind())
        .map(|k| k.rent_bonus())
        .sum();

    Ok(base + bonus)
}

/// First defensive card in the player's free hand, if any.
pub fn find_shield(free_hand: &[Card]) -> Option<CardId> {
    free_hand.iter().find(|c| c.is_shield()).map(|c| c.id)
}

/// Resolve the set of players a dialog stage must be presented to.
///
/// Total over the stage enumeration: selection and choice stages address only
/// the caller; `PayValue` addresses the explicit target or, when none, every
/// player except the caller; `ShieldsUp` addresses only the explicit target
/// (a defensive dialog with no defender is a programming error).
pub fn identify_dialog_audience(
    caller: PlayerId,
    target: Option<PlayerId>,
    all_players: &[PlayerId],
    stage: DialogStage,
) -> Result<Vec<PlayerId>, EngineError> {
    match stage {
        DialogStage::PlayerSelection
        | DialogStage::PropertySetSelection
        | DialogStage::TableHandSelection
        | DialogStage::OwnHandSelection
        | DialogStage::WildcardColorSelection => Ok(vec![caller]),
        DialogStage::PayValue => Ok(match target {
            Some(t) => vec![t],
            None => all_players.iter().copied().filter(|p| *p != caller).collect(),
        }),
        DialogStage::ShieldsUp => {
            let t = target.ok_or_else(|| {
                EngineError::invariant("shields-up dialog opened with no defender")
            })?;
            Ok(vec![t])
        }
    }
}

fn find_in_group<'a>(
    color: PropertyColor,
    group: &'a [Card],
    card_id: CardId,
) -> Result<&'a Card, EngineError> {
    group.iter().find(|c| c.id == card_id).ok_or_else(|| {
        EngineError::not_found(
            NotFoundKind::Card,
            format!("card {card_id} is not in the {color:?} group"),
        )
    })
}

/// A raid takes one card out of a target's group. Completed sets are immune;
/// buildings cannot be taken individually.
pub fn ensure_raid_target(
    color: PropertyColor,
    group: &[Card],
    card_id: CardId,
) -> Result<(), EngineError> {
    let card = find_in_group(color, group, card_id)?;
    if is_set_complete(color, group) {
        return Err(EngineError::rule(
            RuleKind::CompleteSetImmune,
            format!("completed {color:?} set is immune to raids"),
        ));
    }
    if card.building_tier().is_some() {
        return Err(EngineError::rule(
            RuleKind::BuildingNotRaidable,
            format!("building {card_id} cannot be taken individually"),
        ));
    }
    Ok(())
}

/// A takeover claims a whole group; it requires the set to be complete.
pub fn ensure_takeover_target(color: PropertyColor, group: &[Card]) -> Result<(), EngineError> {
    if !is_set_complete(color, group) {
        return Err(EngineError::rule(
            RuleKind::CompleteSetRequired,
            format!("{color:?} set is not complete"),
        ));
    }
    Ok(())
}

/// The card an initiator offers in a trade: buildings stay with their set,
/// and a completed set carrying buildings cannot be broken up.
pub fn ensure_trade_offer(
    color: PropertyColor,
    group: &[Card],
    card_id: CardId,
) -> Result<(), EngineError> {
    let card = find_in_group(color, group, card_id)?;
    if card.building_tier().is_some() {
        return Err(EngineError::rule(
            RuleKind::BuildingNotRaidable,
            format!("building {card_id} cannot be traded away"),
        ));
    }
    let has_building = group.iter().any(|c| c.building_tier().is_some());
    if is_set_complete(color, group) && has_building {
        return Err(EngineError::rule(
            RuleKind::CompleteSetImmune,
            format!("completed {color:?} set with buildings cannot be broken by a trade"),
        ));
    }
    Ok(())
}

/// Building placement: the set must be complete, a hotel requires a house,
/// and each tier may appear at most once per set.
pub fn ensure_buildable(
    color: PropertyColor,
    group: &[Card],
    tier: BuildingTier,
) -> Result<(), EngineError> {
    if !is_set_complete(color, group) {
        return Err(EngineError::rule(
            RuleKind::CompleteSetRequired,
            format!("buildings require a completed {color:?} set"),
        ));
    }
    let tiers: Vec<BuildingTier> = group.iter().filter_map(|c| c.building_tier()).collect();
    if tiers.contains(&tier) {
        return Err(EngineError::rule(
            RuleKind::DuplicateBuilding,
            format!("{color:?} set already has a {tier:?}"),
        ));
    }
    if tier == BuildingTier::Hotel && !tiers.contains(&BuildingTier::House) {
        return Err(EngineError::rule(
            RuleKind::BuildingOrder,
            format!("{color:?} set needs a house before a hotel"),
        ));
    }
    Ok(())
}

/// Sum of the cards' own bank values. Payment never makes change.
pub fn payment_total(cards: &[Card]) -> u32 {
    cards.iter().map(|c| c.bank_value).sum()
}

/// A payment must cover the demand unless it exhausts the payer's combined
/// bank and table holdings.
pub fn ensure_payment_covers(
    selected_total: u32,
    owed: u32,
    holdings_total: u32,
) -> Result<(), EngineError> {
    if selected_total >= owed {
        return Ok(());
    }
    if selected_total >= holdings_total {
        // Payer is wiped out; a short payment is legal.
        return Ok(());
    }
    Err(EngineError::rule(
        RuleKind::PaymentShort,
        format!("offered {selected_total} against {owed} owed with holdings remaining"),
    ))
}
