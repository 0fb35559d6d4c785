//! Hand-rolled card builders for unit tests.
//!
//! Full fixture decks for integration tests live in `engine-test-support`;
//! these helpers stay small so a test can state exactly the cards it needs.

use crate::domain::cards::{
    Card, CardBody, CommandKind, PropertyColor, TributeScope, WildcardScope,
};

pub fn money(value: u32) -> Card {
    Card::new(format!("{value}M"), value, "money", CardBody::Money)
}

/// Standard property with the canonical tier table for its color's set size.
pub fn property(name: &str, color: PropertyColor) -> Card {
    let tiers: Vec<u32> = match color.set_size() {
        2 => vec![1, 2],
        _ => vec![2, 4, 7],
    };
    property_with_tiers(name, color, &tiers)
}

pub fn property_with_tiers(name: &str, color: PropertyColor, tiers: &[u32]) -> Card {
    Card::new(
        name,
        2,
        "property",
        CardBody::Property {
            color,
            rent_tiers: tiers.to_vec(),
        },
    )
}

pub fn wildcard_dual(a: PropertyColor, b: PropertyColor) -> Card {
    Card::new(
        format!("{a:?}/{b:?} wildcard"),
        0,
        "wildcard",
        CardBody::PropertyWildcard {
            scope: WildcardScope::Dual(a, b),
        },
    )
}

pub fn wildcard_any() -> Card {
    Card::new(
        "any-color wildcard",
        0,
        "wildcard",
        CardBody::PropertyWildcard {
            scope: WildcardScope::Any,
        },
    )
}

pub fn command(kind: CommandKind) -> Card {
    let value = match kind {
        CommandKind::Shield => 4,
        _ => 3,
    };
    Card::new(
        format!("{kind:?}"),
        value,
        "command",
        CardBody::Command { kind },
    )
}

pub fn shield() -> Card {
    command(CommandKind::Shield)
}

pub fn tribute(colors: &[PropertyColor]) -> Card {
    Card::new(
        "tribute",
        1,
        "tribute",
        CardBody::Tribute {
            colors: TributeScope::Colors(colors.to_vec()),
            targeted: false,
        },
    )
}

pub fn tribute_targeted_any() -> Card {
    Card::new(
        "targeted tribute",
        1,
        "tribute",
        CardBody::Tribute {
            colors: TributeScope::Any,
            targeted: true,
        },
    )
}
