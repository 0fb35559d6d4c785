//! Levy: demand a fixed payment from one chosen player.

use crate::domain::action::{ActionContext, ActionKind, DialogStage};
use crate::domain::cards::{Card, CommandKind, PlayerId};
use crate::errors::EngineError;
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::state::room::Room;

pub struct LevyHandler;

impl ActionHandler for LevyHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Levy
    }

    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        shared::ensure_kind(card, self.kind())?;
        let amount = match card.command_kind() {
            Some(CommandKind::Levy { amount }) => *amount,
            _ => return Err(EngineError::invariant("levy handler fed a non-levy card")),
        };

        let mut ctx = shared::open_context(
            room,
            initiator,
            card,
            self.kind(),
            DialogStage::PlayerSelection,
        )?;
        ctx.payment_value = Some(amount);
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
                shared::divert_to_shield_or(room, ctx, |ctx| open_pay_value(room, ctx))
            }
            DialogStage::ShieldsUp => {
                shared::resolve_shields_up(room, responder, ctx, |ctx| open_pay_value(room, ctx))
            }
            DialogStage::PayValue => {
                let events = shared::collect_payment(room, responder, &ctx)?;
                Ok(HandlerOutcome::Complete { events })
            }
            _ => Err(shared::wrong_stage(&ctx)),
        }
    }
}

fn open_pay_value(room: &Room, ctx: ActionContext) -> Result<HandlerOutcome, EngineError> {
    let target = ctx.require_target("levy")?;
    let context = shared::next_stage(room, ctx, target, Some(target), DialogStage::PayValue)?;
    Ok(HandlerOutcome::NextStage {
        context,
        events: Vec::new(),
    })
}
