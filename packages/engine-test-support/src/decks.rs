//! Fixture decks and card builders for integration tests.
//!
//! The engine consumes an already-validated, already-shuffled card list, so
//! tests need a realistic deck source. Builders here mirror the standard
//! rules: set sizes of two or three per color, canonical tier tables, and a
//! command spread that exercises every action kind.

use engine::domain::cards::{
    Card, CardBody, CommandKind, PropertyColor, TributeScope, WildcardScope,
};

pub fn money(value: u32) -> Card {
    Card::new(format!("{value}M"), value, "money", CardBody::Money)
}

/// Standard property with the canonical tier table for its color.
pub fn property(name: &str, color: PropertyColor) -> Card {
    let rent_tiers = match color.set_size() {
        2 => vec![1, 2],
        _ => vec![2, 4, 7],
    };
    Card::new(name, 2, "property", CardBody::Property { color, rent_tiers })
}

pub fn wildcard_dual(a: PropertyColor, b: PropertyColor) -> Card {
    Card::new(
        format!("{a:?}/{b:?} wildcard"),
        0,
        "counts toward either color",
        CardBody::PropertyWildcard {
            scope: WildcardScope::Dual(a, b),
        },
    )
}

pub fn wildcard_any() -> Card {
    Card::new(
        "any-color wildcard",
        0,
        "counts toward any color",
        CardBody::PropertyWildcard {
            scope: WildcardScope::Any,
        },
    )
}

pub fn command(kind: CommandKind) -> Card {
    let (name, value) = match &kind {
        CommandKind::DrawTwo => ("Windfall", 1),
        CommandKind::HostileTakeover => ("Hostile Takeover", 5),
        CommandKind::PirateRaid => ("Pirate Raid", 3),
        CommandKind::ForcedTrade => ("Forced Trade", 3),
        CommandKind::Levy { .. } => ("Levy", 3),
        CommandKind::Jubilee { .. } => ("Jubilee", 2),
        CommandKind::BuildHouse { .. } => ("House", 3),
        CommandKind::BuildHotel { .. } => ("Hotel", 4),
        CommandKind::TradeEmbargo => ("Trade Embargo", 2),
        CommandKind::Shield => ("Shield", 4),
    };
    Card::new(name, value, "command", CardBody::Command { kind })
}

pub fn shield() -> Card {
    command(CommandKind::Shield)
}

pub fn tribute(colors: &[PropertyColor]) -> Card {
    Card::new(
        "Tribute",
        1,
        "rent from everyone",
        CardBody::Tribute {
            colors: TributeScope::Colors(colors.to_vec()),
            targeted: false,
        },
    )
}

pub fn tribute_targeted_any() -> Card {
    Card::new(
        "Targeted Tribute",
        3,
        "rent from one player, any color",
        CardBody::Tribute {
            colors: TributeScope::Any,
            targeted: true,
        },
    )
}

/// The standard fixture deck, unshuffled. Every action kind is represented.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::new();

    // Properties: full sets for every color.
    for color in PropertyColor::ALL {
        for i in 0..color.set_size() {
            deck.push(property(&format!("{color:?} #{}", i + 1), color));
        }
    }

    // Wildcards.
    deck.push(wildcard_dual(PropertyColor::Umber, PropertyColor::Cobalt));
    deck.push(wildcard_dual(PropertyColor::Emerald, PropertyColor::Amber));
    deck.push(wildcard_dual(PropertyColor::Coral, PropertyColor::Slate));
    deck.push(wildcard_any());

    // Money.
    for value in [1, 1, 2, 2, 3, 3, 4, 5, 5, 10] {
        deck.push(money(value));
    }

    // Commands.
    for _ in 0..2 {
        deck.push(command(CommandKind::DrawTwo));
        deck.push(command(CommandKind::PirateRaid));
        deck.push(command(CommandKind::ForcedTrade));
        deck.push(command(CommandKind::Levy { amount: 3 }));
        deck.push(command(CommandKind::BuildHouse { bonus: 3 }));
        deck.push(command(CommandKind::Shield));
    }
    deck.push(command(CommandKind::HostileTakeover));
    deck.push(command(CommandKind::Jubilee { amount: 2 }));
    deck.push(command(CommandKind::BuildHotel { bonus: 4 }));
    deck.push(command(CommandKind::TradeEmbargo));

    // Tributes.
    deck.push(tribute(&[PropertyColor::Umber, PropertyColor::Cobalt]));
    deck.push(tribute(&[PropertyColor::Emerald, PropertyColor::Amber]));
    deck.push(tribute(&[PropertyColor::Crimson, PropertyColor::Violet]));
    deck.push(tribute_targeted_any());

    deck
}

/// The standard deck, deterministically shuffled.
///
/// SplitMix64-driven Fisher-Yates: deterministic given the seed, with no
/// dependency on the engine's own shuffling path (tests should not exercise
/// the code they verify).
pub fn shuffled_deck(seed: u64) -> Vec<Card> {
    let mut deck = standard_deck();
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = state;
        z ^= z >> 30;
        z = z.wrapping_mul(0xBF58476D1CE4E5B9);
        z ^= z >> 27;
        z = z.wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    };
    for i in (1..deck.len()).rev() {
        let j = (next() % (i as u64 + 1)) as usize;
        deck.swap(i, j);
    }
    deck
}
