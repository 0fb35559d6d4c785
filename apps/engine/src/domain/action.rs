//! Action kinds, dialog stages, and the evolving per-action context.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{
    Card, CardBody, CardId, CommandKind, PlayerId, PropertyColor, TributeScope,
};
use crate::errors::EngineError;

/// The card-triggered effects the engine can coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    DrawTwo,
    HostileTakeover,
    PirateRaid,
    ForcedTrade,
    Tribute,
    TargetedTribute,
    Levy,
    Jubilee,
    BuildHouse,
    BuildHotel,
    TradeEmbargo,
    Shield,
}

impl ActionKind {
    /// Action kind a card triggers when played to the action slot, if any.
    pub fn for_card(card: &Card) -> Option<ActionKind> {
        match &card.body {
            CardBody::Command { kind } => Some(match kind {
                CommandKind::DrawTwo => ActionKind::DrawTwo,
                CommandKind::HostileTakeover => ActionKind::HostileTakeover,
                CommandKind::PirateRaid => ActionKind::PirateRaid,
                CommandKind::ForcedTrade => ActionKind::ForcedTrade,
                CommandKind::Levy { .. } => ActionKind::Levy,
                CommandKind::Jubilee { .. } => ActionKind::Jubilee,
                CommandKind::BuildHouse { .. } => ActionKind::BuildHouse,
                CommandKind::BuildHotel { .. } => ActionKind::BuildHotel,
                CommandKind::TradeEmbargo => ActionKind::TradeEmbargo,
                CommandKind::Shield => ActionKind::Shield,
            }),
            CardBody::Tribute { targeted, .. } => Some(if *targeted {
                ActionKind::TargetedTribute
            } else {
                ActionKind::Tribute
            }),
            _ => None,
        }
    }

    /// Actions whose card lands on the table instead of the discard pile.
    pub fn is_building(self) -> bool {
        matches!(self, ActionKind::BuildHouse | ActionKind::BuildHotel)
    }

    /// Whether this action addresses an explicit single target and therefore
    /// opens a shields-up window before executing. Actions that address every
    /// other player at once have no single defender to divert to.
    pub fn shieldable(self) -> bool {
        matches!(
            self,
            ActionKind::HostileTakeover
                | ActionKind::PirateRaid
                | ActionKind::ForcedTrade
                | ActionKind::TargetedTribute
                | ActionKind::Levy
                | ActionKind::TradeEmbargo
        )
    }
}

/// The enumerated step within a multi-step action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogStage {
    PlayerSelection,
    PropertySetSelection,
    TableHandSelection,
    OwnHandSelection,
    WildcardColorSelection,
    PayValue,
    ShieldsUp,
}

/// A responder's stance inside a shields-up window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseVerdict {
    /// Normal response; let the transition proceed.
    Proceed,
    /// Play the defensive card and cancel the action.
    UseShield,
    /// Shield offered but declined; the original transition re-enters with
    /// interrupt checking disabled.
    Decline,
}

/// The evolving state of one in-flight action.
///
/// Cloned per response before any mutation so an in-flight reader never
/// observes a half-updated context; the coordinator is the sole writer of the
/// authoritative copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionContext {
    pub initiator: PlayerId,
    pub card_id: CardId,
    pub kind: ActionKind,
    pub stage: DialogStage,
    /// Players this stage's dialog must be presented to.
    pub audience: Vec<PlayerId>,

    // Response fields, filled in by players as the dialog advances.
    pub target_player: Option<PlayerId>,
    pub chosen_color: Option<PropertyColor>,
    pub chosen_cards: Vec<CardId>,
    pub payment_value: Option<u32>,
    pub verdict: Option<ResponseVerdict>,

    // Engine-managed fields.
    /// Cleared by a declined shield so the original transition re-enters
    /// without re-prompting the defender.
    pub interrupts_enabled: bool,
    /// Wildcards that changed owner and still need a color declaration,
    /// oldest first: (new owner, card).
    pub pending_wildcards: Vec<(PlayerId, CardId)>,
    /// Colors the played tribute card may demand rent for, captured at
    /// initialization (the card itself is discarded when played).
    pub eligible_colors: Option<TributeScope>,
}

impl ActionContext {
    pub fn open(
        initiator: PlayerId,
        card_id: CardId,
        kind: ActionKind,
        stage: DialogStage,
        audience: Vec<PlayerId>,
    ) -> Self {
        Self {
            initiator,
            card_id,
            kind,
            stage,
            audience,
            target_player: None,
            chosen_color: None,
            chosen_cards: Vec::new(),
            payment_value: None,
            verdict: None,
            interrupts_enabled: true,
            pending_wildcards: Vec::new(),
            eligible_colors: None,
        }
    }

    /// Move this context to a new stage with a freshly computed audience.
    pub fn advanced(mut self, stage: DialogStage, audience: Vec<PlayerId>) -> Self {
        self.stage = stage;
        self.audience = audience;
        self.verdict = None;
        self
    }

    pub fn require_target(&self, ctx: &'static str) -> Result<PlayerId, EngineError> {
        self.target_player
            .ok_or_else(|| EngineError::invariant(format!("target_player must be set ({ctx})")))
    }

    pub fn require_color(&self, ctx: &'static str) -> Result<PropertyColor, EngineError> {
        self.chosen_color
            .ok_or_else(|| EngineError::invariant(format!("chosen_color must be set ({ctx})")))
    }

    pub fn require_payment_value(&self, ctx: &'static str) -> Result<u32, EngineError> {
        self.payment_value
            .ok_or_else(|| EngineError::invariant(format!("payment_value must be set ({ctx})")))
    }

    pub fn require_verdict(&self, ctx: &'static str) -> Result<ResponseVerdict, EngineError> {
        self.verdict
            .ok_or_else(|| EngineError::invariant(format!("verdict must be set ({ctx})")))
    }

    pub fn require_chosen_card(&self, ctx: &'static str) -> Result<CardId, EngineError> {
        self.chosen_cards.first().copied().ok_or_else(|| {
            EngineError::invariant(format!("chosen_cards must not be empty ({ctx})"))
        })
    }

    pub fn require_eligible_colors(&self, ctx: &'static str) -> Result<&TributeScope, EngineError> {
        self.eligible_colors
            .as_ref()
            .ok_or_else(|| EngineError::invariant(format!("eligible_colors must be set ({ctx})")))
    }
}
