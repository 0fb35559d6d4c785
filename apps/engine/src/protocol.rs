//! Outbound event types handed to the transport layer.
//!
//! The engine returns these from its boundary calls; delivering them (and to
//! whom) is the transport's concern. Dialog events are addressed only to the
//! audience the rule evaluator computed.

use serde::{Deserialize, Serialize};

use crate::domain::action::{ActionContext, ActionKind};
use crate::domain::cards::{CardId, PlayerId, PropertyColor};

/// Where a turn card is being played to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayDestination {
    Bank,
    Table,
    Action,
}

/// A dialog the transport must present to its audience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogRequest {
    pub audience: Vec<PlayerId>,
    pub context: ActionContext,
}

impl From<ActionContext> for DialogRequest {
    fn from(context: ActionContext) -> Self {
        Self {
            audience: context.audience.clone(),
            context,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A card left a player's free hand for the bank or table.
    CardPlayed {
        player: PlayerId,
        card: CardId,
        destination: PlayDestination,
    },

    /// An action finished and moved cards. `affected` is the player whose
    /// collections were touched besides the initiator, when there is one.
    ActionResolved {
        initiator: PlayerId,
        affected: Option<PlayerId>,
        kind: ActionKind,
        cards: Vec<CardId>,
    },

    /// A defensive card cancelled an action. The would-be victim is the
    /// beneficiary of the cancellation for notification purposes.
    ActionBlocked {
        initiator: PlayerId,
        defender: PlayerId,
        kind: ActionKind,
    },

    CardsDrawn {
        player: PlayerId,
        count: usize,
    },

    /// An emptied free hand was refilled to the configured size.
    HandRefilled {
        player: PlayerId,
        count: usize,
    },

    WildcardAssigned {
        player: PlayerId,
        card: CardId,
        color: PropertyColor,
    },

    EmbargoImposed {
        initiator: PlayerId,
        target: PlayerId,
    },

    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    GameWon {
        winner: PlayerId,
    },
}
