//! Trade embargo: isolate a chosen player from trades and raids until the
//! initiator's next turn begins.

use tracing::info;

use crate::domain::action::{ActionContext, ActionKind, DialogStage};
use crate::domain::cards::{Card, PlayerId};
use crate::errors::EngineError;
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::protocol::EngineEvent;
use crate::state::room::Room;

pub struct TradeEmbargoHandler;

impl ActionHandler for TradeEmbargoHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::TradeEmbargo
    }

    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        shared::ensure_kind(card, self.kind())?;
        let ctx =
            shared::open_context(room, initiator, card, self.kind(), DialogStage::PlayerSelection)?;
        Ok(InitializeOutcome::Dialog(ctx))
    }

    fn process_response(
        &self,
        room: &Room,
        responder: PlayerId,
        ctx: ActionContext,
    ) -> Result<HandlerOutcome, EngineError> {
        match ctx.stage {
            DialogStage::PlayerSelection => {
                shared::select_target(room, &ctx, responder)?;
                shared::divert_to_shield_or(room, ctx, |ctx| execute_embargo(room, ctx))
            }
            DialogStage::ShieldsUp => {
                shared::resolve_shields_up(room, responder, ctx, |ctx| execute_embargo(room, ctx))
            }
            _ => Err(shared::wrong_stage(&ctx)),
        }
    }
}

fn execute_embargo(room: &Room, ctx: ActionContext) -> Result<HandlerOutcome, EngineError> {
    let target = ctx.require_target("embargo execute")?;
    room.turns().impose_embargo(target, ctx.initiator);
    info!(initiator = %ctx.initiator, %target, "trade embargo imposed");

    Ok(HandlerOutcome::Complete {
        events: vec![EngineEvent::EmbargoImposed {
            initiator: ctx.initiator,
            target,
        }],
    })
}
