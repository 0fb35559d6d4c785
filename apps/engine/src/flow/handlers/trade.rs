//! Forced trade: swap one table card each way with a chosen target.

use tracing::info;

use crate::domain::action::{ActionContext, ActionKind, DialogStage};
use crate::domain::cards::{Card, CardId, PlayerId};
use crate::domain::rules;
use crate::errors::{EngineError, RuleKind};
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::protocol::EngineEvent;
use crate::state::room::Room;

pub struct ForcedTradeHandler;

impl ActionHandler for ForcedTradeHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::ForcedTrade
    }

    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        shared::ensure_kind(card, self.kind())?;
        if room.turns().is_embargoed(initiator) {
            return Err(EngineError::rule(
                RuleKind::Embargoed,
                "an embargoed player cannot initiate trades",
            ));
        }
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
                validate_take_side(room, &ctx)?;
                let context =
                    shared::next_stage(room, ctx, responder, None, DialogStage::OwnHandSelection)?;
                Ok(HandlerOutcome::NextStage {
                    context,
                    events: Vec::new(),
                })
            }
            DialogStage::OwnHandSelection => {
                shared::ensure_initiator(&ctx, responder)?;
                validate_take_side(room, &ctx)?;
                validate_give_side(room, &ctx)?;
                shared::divert_to_shield_or(room, ctx, |ctx| execute_trade(room, ctx))
            }
            DialogStage::ShieldsUp => {
                shared::resolve_shields_up(room, responder, ctx, |ctx| execute_trade(room, ctx))
            }
            DialogStage::WildcardColorSelection => {
                shared::handle_wildcard_color(room, responder, ctx)
            }
            _ => Err(shared::wrong_stage(&ctx)),
        }
    }
}

/// First chosen card: the one taken from the target's table.
fn take_card(ctx: &ActionContext) -> Result<CardId, EngineError> {
    ctx.require_chosen_card("trade take selection")
}

/// Second chosen card: the one the initiator offers back.
fn give_card(ctx: &ActionContext) -> Result<CardId, EngineError> {
    ctx.chosen_cards.get(1).copied().ok_or_else(|| {
        EngineError::invariant("own-hand selection needs the offered card as well")
    })
}

fn validate_take_side(room: &Room, ctx: &ActionContext) -> Result<(), EngineError> {
    let target = ctx.require_target("trade take selection")?;
    let take = take_card(ctx)?;
    room.hands().with_hands(target, |hands| {
        let color = shared::locate_table_color(hands, take)?;
        // Same immunity as a raid: a completed set cannot lose a card.
        rules::ensure_raid_target(color, hands.require_group(color)?, take)
    })
}

fn validate_give_side(room: &Room, ctx: &ActionContext) -> Result<(), EngineError> {
    let give = give_card(ctx)?;
    room.hands().with_hands(ctx.initiator, |hands| {
        let color = shared::locate_table_color(hands, give)?;
        rules::ensure_trade_offer(color, hands.require_group(color)?, give)
    })
}

fn execute_trade(room: &Room, ctx: ActionContext) -> Result<HandlerOutcome, EngineError> {
    validate_take_side(room, &ctx)?;
    validate_give_side(room, &ctx)?;
    let target = ctx.require_target("trade execute")?;
    let take = take_card(&ctx)?;
    let give = give_card(&ctx)?;

    let report = room
        .executor()
        .swap_table_cards(ctx.initiator, give, target, take)?;
    info!(initiator = %ctx.initiator, %target, "forced trade resolved");

    let mut events = vec![EngineEvent::ActionResolved {
        initiator: ctx.initiator,
        affected: Some(target),
        kind: ctx.kind,
        cards: vec![report.taken, report.given],
    }];
    // Either side of the swap may have completed a set.
    if let Some(win) = shared::check_win(room, ctx.initiator)? {
        events.push(win);
    }
    if let Some(win) = shared::check_win(room, target)? {
        events.push(win);
    }

    let mut ctx = ctx;
    if report.taken_was_wildcard {
        ctx.pending_wildcards.push((ctx.initiator, report.taken));
    }
    if report.given_was_wildcard {
        ctx.pending_wildcards.push((target, report.given));
    }
    shared::open_wildcards_or_complete(room, ctx, events)
}
