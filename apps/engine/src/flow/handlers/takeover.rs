//! Hostile takeover: claim a target's entire completed color group.

use tracing::info;

use crate::domain::action::{ActionContext, ActionKind, DialogStage};
use crate::domain::cards::{Card, PlayerId};
use crate::domain::rules;
use crate::errors::EngineError;
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::protocol::EngineEvent;
use crate::state::room::Room;

pub struct HostileTakeoverHandler;

impl ActionHandler for HostileTakeoverHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::HostileTakeover
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
                let context = shared::next_stage(
                    room,
                    ctx,
                    responder,
                    None,
                    DialogStage::PropertySetSelection,
                )?;
                Ok(HandlerOutcome::NextStage {
                    context,
                    events: Vec::new(),
                })
            }
            DialogStage::PropertySetSelection => {
                shared::ensure_initiator(&ctx, responder)?;
                validate_takeover(room, &ctx)?;
                shared::divert_to_shield_or(room, ctx, |ctx| execute_takeover(room, ctx))
            }
            DialogStage::ShieldsUp => {
                shared::resolve_shields_up(room, responder, ctx, |ctx| execute_takeover(room, ctx))
            }
            _ => Err(shared::wrong_stage(&ctx)),
        }
    }
}

/// A takeover requires the chosen set to be complete (the asymmetric twin of
/// the raid's complete-set immunity).
fn validate_takeover(room: &Room, ctx: &ActionContext) -> Result<(), EngineError> {
    let target = ctx.require_target("takeover set selection")?;
    let color = ctx.require_color("takeover set selection")?;
    room.hands().with_hands(target, |hands| {
        rules::ensure_takeover_target(color, hands.require_group(color)?)
    })
}

fn execute_takeover(room: &Room, ctx: ActionContext) -> Result<HandlerOutcome, EngineError> {
    // Re-validate: a declined shield re-enters here and the table may have
    // changed since the selection was made.
    validate_takeover(room, &ctx)?;
    let target = ctx.require_target("takeover execute")?;
    let color = ctx.require_color("takeover execute")?;

    let moved = room
        .executor()
        .execute_full_set_takeover(target, ctx.initiator, color)?;
    info!(initiator = %ctx.initiator, %target, ?color, "hostile takeover resolved");

    let mut events = vec![EngineEvent::ActionResolved {
        initiator: ctx.initiator,
        affected: Some(target),
        kind: ctx.kind,
        cards: moved,
    }];
    if let Some(win) = shared::check_win(room, ctx.initiator)? {
        events.push(win);
    }
    Ok(HandlerOutcome::Complete { events })
}
