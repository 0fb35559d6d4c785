//! Building placement on the initiator's own completed sets.

use tracing::info;

use crate::domain::action::{ActionContext, ActionKind, DialogStage};
use crate::domain::cards::{BuildingTier, Card, PlayerId};
use crate::domain::rules;
use crate::errors::{EngineError, RuleKind};
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::protocol::EngineEvent;
use crate::state::room::Room;

/// Covers both building tiers; houses and hotels differ only in their kind,
/// tier, and ordering rule.
pub struct BuildHandler {
    kind: ActionKind,
    tier: BuildingTier,
}

impl BuildHandler {
    pub fn house() -> Self {
        Self {
            kind: ActionKind::BuildHouse,
            tier: BuildingTier::House,
        }
    }

    pub fn hotel() -> Self {
        Self {
            kind: ActionKind::BuildHotel,
            tier: BuildingTier::Hotel,
        }
    }
}

impl ActionHandler for BuildHandler {
    fn kind(&self) -> ActionKind {
        self.kind
    }

    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        shared::ensure_kind(card, self.kind)?;

        // The dialog is pointless without at least one set that can take
        // this building.
        let any = room.hands().with_hands(initiator, |hands| {
            Ok(hands
                .table()
                .iter()
                .any(|(color, group)| rules::ensure_buildable(*color, group, self.tier).is_ok()))
        })?;
        if !any {
            return Err(EngineError::rule(
                RuleKind::CompleteSetRequired,
                "no completed set can take this building",
            ));
        }

        let ctx = shared::open_context(
            room,
            initiator,
            card,
            self.kind,
            DialogStage::PropertySetSelection,
        )?;
        Ok(InitializeOutcome::Dialog(ctx))
    }

    fn process_response(
        &self,
        room: &Room,
        responder: PlayerId,
        ctx: ActionContext,
    ) -> Result<HandlerOutcome, EngineError> {
        match ctx.stage {
            DialogStage::PropertySetSelection => {
                shared::ensure_initiator(&ctx, responder)?;
                let color = ctx.require_color("build set selection")?;
                room.hands().with_hands(ctx.initiator, |hands| {
                    rules::ensure_buildable(color, hands.require_group(color)?, self.tier)
                })?;

                room.executor()
                    .execute_build_on_set(ctx.initiator, ctx.card_id, color)?;
                info!(initiator = %ctx.initiator, ?color, tier = ?self.tier, "building placed");

                Ok(HandlerOutcome::Complete {
                    events: vec![EngineEvent::ActionResolved {
                        initiator: ctx.initiator,
                        affected: None,
                        kind: ctx.kind,
                        cards: vec![ctx.card_id],
                    }],
                })
            }
            _ => Err(shared::wrong_stage(&ctx)),
        }
    }
}
