//! Pirate raid: take a single property out of a target's incomplete group.

use tracing::info;

use crate::domain::action::{ActionContext, ActionKind, DialogStage};
use crate::domain::cards::{Card, PlayerId};
use crate::domain::rules;
use crate::errors::{EngineError, RuleKind};
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::protocol::EngineEvent;
use crate::state::room::Room;

pub struct PirateRaidHandler;

impl ActionHandler for PirateRaidHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::PirateRaid
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
                let target = shared::select_target(room, &ctx, responder)?;
                if room.turns().is_embargoed(target) {
                    return Err(EngineError::rule(
                        RuleKind::Embargoed,
                        format!("player {target} is under a trade embargo"),
                    ));
                }
                let context = shared::next_stage(
                    room,
                    ctx,
                    responder,
                    None,
                    DialogStage::TableHandSelection,
                )?;
                Ok(HandlerOutcome::NextStage {
                    context,
                    events: Vec::new(),
                })
            }
            DialogStage::TableHandSelection => {
                shared::ensure_initiator(&ctx, responder)?;
                validate_raid(room, &ctx)?;
                shared::divert_to_shield_or(room, ctx, |ctx| execute_raid(room, ctx))
            }
            DialogStage::ShieldsUp => {
                shared::resolve_shields_up(room, responder, ctx, |ctx| execute_raid(room, ctx))
            }
            DialogStage::WildcardColorSelection => {
                shared::handle_wildcard_color(room, responder, ctx)
            }
            _ => Err(shared::wrong_stage(&ctx)),
        }
    }
}

fn validate_raid(room: &Room, ctx: &ActionContext) -> Result<(), EngineError> {
    let target = ctx.require_target("raid selection")?;
    let card_id = ctx.require_chosen_card("raid selection")?;
    room.hands().with_hands(target, |hands| {
        let color = shared::locate_table_color(hands, card_id)?;
        rules::ensure_raid_target(color, hands.require_group(color)?, card_id)
    })
}

fn execute_raid(room: &Room, ctx: ActionContext) -> Result<HandlerOutcome, EngineError> {
    validate_raid(room, &ctx)?;
    let target = ctx.require_target("raid execute")?;
    let card_id = ctx.require_chosen_card("raid execute")?;

    let (color, was_wildcard) = room
        .executor()
        .move_table_card(target, ctx.initiator, card_id)?;
    info!(initiator = %ctx.initiator, %target, ?color, "pirate raid resolved");

    let mut events = vec![EngineEvent::ActionResolved {
        initiator: ctx.initiator,
        affected: Some(target),
        kind: ctx.kind,
        cards: vec![card_id],
    }];
    if let Some(win) = shared::check_win(room, ctx.initiator)? {
        events.push(win);
    }

    let mut ctx = ctx;
    if was_wildcard {
        // The receiver, not necessarily the initiator of the wider action,
        // declares which color group absorbs the card.
        ctx.pending_wildcards.push((ctx.initiator, card_id));
    }
    shared::open_wildcards_or_complete(room, ctx, events)
}
