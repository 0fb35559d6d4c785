//! Tribute (rent) demands: against every other player, or a single chosen
//! target for the targeted variant.

use tracing::debug;

use crate::domain::action::{ActionContext, ActionKind, DialogStage};
use crate::domain::cards::{Card, PlayerId, PropertyColor, TributeScope};
use crate::domain::rules;
use crate::errors::{EngineError, RuleKind};
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::state::room::Room;

pub struct TributeHandler;

impl ActionHandler for TributeHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Tribute
    }

    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        shared::ensure_kind(card, self.kind())?;
        let scope = tribute_scope(card)?;
        ensure_rentable_group(room, initiator, &scope)?;

        let mut ctx = shared::open_context(
            room,
            initiator,
            card,
            self.kind(),
            DialogStage::PropertySetSelection,
        )?;
        ctx.eligible_colors = Some(scope);
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
                let rent = assess_rent(room, &ctx)?;
                let mut ctx = ctx;
                ctx.payment_value = Some(rent);
                // No explicit target: the demand addresses every other player.
                let context =
                    shared::next_stage(room, ctx, responder, None, DialogStage::PayValue)?;
                Ok(HandlerOutcome::NextStage {
                    context,
                    events: Vec::new(),
                })
            }
            DialogStage::PayValue => {
                let events = shared::collect_payment(room, responder, &ctx)?;
                Ok(HandlerOutcome::Complete { events })
            }
            _ => Err(shared::wrong_stage(&ctx)),
        }
    }
}

pub struct TargetedTributeHandler;

impl ActionHandler for TargetedTributeHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::TargetedTribute
    }

    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        shared::ensure_kind(card, self.kind())?;
        let scope = tribute_scope(card)?;
        ensure_rentable_group(room, initiator, &scope)?;

        let mut ctx = shared::open_context(
            room,
            initiator,
            card,
            self.kind(),
            DialogStage::PlayerSelection,
        )?;
        ctx.eligible_colors = Some(scope);
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
                let rent = assess_rent(room, &ctx)?;
                let mut ctx = ctx;
                ctx.payment_value = Some(rent);
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
    let target = ctx.require_target("targeted tribute")?;
    let context = shared::next_stage(room, ctx, target, Some(target), DialogStage::PayValue)?;
    Ok(HandlerOutcome::NextStage {
        context,
        events: Vec::new(),
    })
}

fn tribute_scope(card: &Card) -> Result<TributeScope, EngineError> {
    match &card.body {
        crate::domain::cards::CardBody::Tribute { colors, .. } => Ok(colors.clone()),
        _ => Err(EngineError::invariant("tribute handler fed a non-tribute card")),
    }
}

/// A tribute is only playable with at least one rent-anchoring group in
/// scope.
fn ensure_rentable_group(
    room: &Room,
    initiator: PlayerId,
    scope: &TributeScope,
) -> Result<(), EngineError> {
    let any = room.hands().with_hands(initiator, |hands| {
        Ok(hands.table().iter().any(|(color, group)| {
            scope.allows(*color) && rules::calculate_rent(*color, group).is_ok()
        }))
    })?;
    if any {
        Ok(())
    } else {
        Err(EngineError::rule(
            RuleKind::InvalidRentTarget,
            "no eligible property group to demand tribute for",
        ))
    }
}

/// Validate the chosen color and compute the rent it commands.
fn assess_rent(room: &Room, ctx: &ActionContext) -> Result<u32, EngineError> {
    let color: PropertyColor = ctx.require_color("tribute set selection")?;
    let scope = ctx.require_eligible_colors("tribute set selection")?;
    if !scope.allows(color) {
        return Err(EngineError::rule(
            RuleKind::InvalidRentTarget,
            format!("this tribute card cannot demand {color:?} rent"),
        ));
    }
    let rent = room.hands().with_hands(ctx.initiator, |hands| {
        rules::calculate_rent(color, hands.require_group(color)?)
    })?;
    debug!(initiator = %ctx.initiator, ?color, rent, "tribute assessed");
    Ok(rent)
}
