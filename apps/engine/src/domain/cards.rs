//! Core card-related types: ids, colors, and the card variant model.
//!
//! Cards are immutable after construction. They are created once at
//! deck-build time and only ever relocated between collections; no code path
//! mutates a card in place.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, RuleKind};

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn fresh() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(CardId);
id_type!(PlayerId);
id_type!(RoomId);

/// Property colors. Each color has a fixed set size; a table group of that
/// color is "complete" once it holds that many set-counting cards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PropertyColor {
    Umber,
    Cobalt,
    Emerald,
    Amber,
    Crimson,
    Violet,
    Coral,
    Slate,
}

impl PropertyColor {
    pub const ALL: [PropertyColor; 8] = [
        PropertyColor::Umber,
        PropertyColor::Cobalt,
        PropertyColor::Emerald,
        PropertyColor::Amber,
        PropertyColor::Crimson,
        PropertyColor::Violet,
        PropertyColor::Coral,
        PropertyColor::Slate,
    ];

    /// Number of set-counting cards needed to complete this color.
    pub fn set_size(self) -> usize {
        match self {
            PropertyColor::Umber | PropertyColor::Coral | PropertyColor::Slate => 2,
            _ => 3,
        }
    }
}

/// Colors a property wildcard may be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardScope {
    Dual(PropertyColor, PropertyColor),
    Any,
}

impl WildcardScope {
    pub fn allows(&self, color: PropertyColor) -> bool {
        match self {
            WildcardScope::Dual(a, b) => *a == color || *b == color,
            WildcardScope::Any => true,
        }
    }
}

/// Colors a tribute card may demand rent for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TributeScope {
    Colors(Vec<PropertyColor>),
    Any,
}

impl TributeScope {
    pub fn allows(&self, color: PropertyColor) -> bool {
        match self {
            TributeScope::Colors(colors) => colors.contains(&color),
            TributeScope::Any => true,
        }
    }
}

/// Building tiers placeable on a completed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingTier {
    House,
    Hotel,
}

/// Effects a command card can trigger when played to the action slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    DrawTwo,
    HostileTakeover,
    PirateRaid,
    ForcedTrade,
    Levy { amount: u32 },
    Jubilee { amount: u32 },
    BuildHouse { bonus: u32 },
    BuildHotel { bonus: u32 },
    TradeEmbargo,
    Shield,
}

impl CommandKind {
    pub fn building_tier(&self) -> Option<BuildingTier> {
        match self {
            CommandKind::BuildHouse { .. } => Some(BuildingTier::House),
            CommandKind::BuildHotel { .. } => Some(BuildingTier::Hotel),
            _ => None,
        }
    }

    /// Flat rent bonus contributed when this card sits in a table group.
    pub fn rent_bonus(&self) -> u32 {
        match self {
            CommandKind::BuildHouse { bonus } | CommandKind::BuildHotel { bonus } => *bonus,
            _ => 0,
        }
    }
}

/// Variant-specific card payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBody {
    /// Pure money; the value is the card's `bank_value`.
    Money,
    /// Standard property. `rent_tiers.len()` is the color's max set size;
    /// tier N-1 is the rent owed when N properties of the color are down.
    Property {
        color: PropertyColor,
        rent_tiers: Vec<u32>,
    },
    /// Color-agnostic property. The color it counts toward is an assignment
    /// made when it enters a table hand, constrained by `scope`.
    PropertyWildcard { scope: WildcardScope },
    Command { kind: CommandKind },
    /// Rent demand. `targeted` selects the single-player variant.
    Tribute { colors: TributeScope, targeted: bool },
}

/// A single card instance. Identity (`id`) is preserved across every
/// relocation; cards are never cloned into existence by game logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub bank_value: u32,
    pub description: String,
    pub body: CardBody,
}

impl Card {
    pub fn new(
        name: impl Into<String>,
        bank_value: u32,
        description: impl Into<String>,
        body: CardBody,
    ) -> Self {
        Self {
            id: CardId::fresh(),
            name: name.into(),
            bank_value,
            description: description.into(),
            body,
        }
    }

    pub fn is_money(&self) -> bool {
        matches!(self.body, CardBody::Money)
    }

    /// Standard property or wildcard: placeable in a table hand and counted
    /// toward set completion.
    pub fn counts_toward_set(&self) -> bool {
        matches!(
            self.body,
            CardBody::Property { .. } | CardBody::PropertyWildcard { .. }
        )
    }

    pub fn property_color(&self) -> Option<PropertyColor> {
        match &self.body {
            CardBody::Property { color, .. } => Some(*color),
            _ => None,
        }
    }

    pub fn wildcard_scope(&self) -> Option<&WildcardScope> {
        match &self.body {
            CardBody::PropertyWildcard { scope } => Some(scope),
            _ => None,
        }
    }

    pub fn command_kind(&self) -> Option<&CommandKind> {
        match &self.body {
            CardBody::Command { kind } => Some(kind),
            _ => None,
        }
    }

    pub fn building_tier(&self) -> Option<BuildingTier> {
        self.command_kind().and_then(CommandKind::building_tier)
    }

    pub fn is_shield(&self) -> bool {
        matches!(self.command_kind(), Some(CommandKind::Shield))
    }

    /// Validate that a wildcard may take `color`.
    pub fn ensure_wildcard_accepts(&self, color: PropertyColor) -> Result<(), EngineError> {
        match self.wildcard_scope() {
            Some(scope) if scope.allows(color) => Ok(()),
            Some(_) => Err(EngineError::rule(
                RuleKind::WildcardColorInvalid,
                format!("wildcard {} cannot take color {color:?}", self.id),
            )),
            None => Err(EngineError::rule(
                RuleKind::WildcardColorInvalid,
                format!("card {} is not a wildcard", self.id),
            )),
        }
    }
}
