//! Per-player hand views handed to the transport layer.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, CardId, PlayerId, PropertyColor};
use crate::domain::rules;

/// Transfer view of a single card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub name: String,
    pub bank_value: u32,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            name: card.name.clone(),
            bank_value: card.bank_value,
        }
    }
}

/// One table color group with its completion status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGroupView {
    pub color: PropertyColor,
    pub cards: Vec<CardView>,
    pub complete: bool,
}

impl TableGroupView {
    pub fn from_group(color: PropertyColor, group: &[Card]) -> Self {
        Self {
            color,
            cards: group.iter().map(CardView::from).collect(),
            complete: rules::is_set_complete(color, group),
        }
    }
}

/// Snapshot of one player's three hand partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHandsSnapshot {
    pub player: PlayerId,
    pub free_hand: Vec<CardView>,
    pub bank: Vec<CardView>,
    pub table: Vec<TableGroupView>,
    pub bank_total: u32,
}
