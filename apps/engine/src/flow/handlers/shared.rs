//! Transition steps shared by several handlers: audience staging, shield
//! interrupts, payment collection, wildcard re-declaration, win detection.

use tracing::info;

use crate::domain::action::{ActionContext, ActionKind, DialogStage, ResponseVerdict};
use crate::domain::cards::{Card, CardId, PlayerId, PropertyColor};
use crate::domain::rules;
use crate::errors::{EngineError, NotFoundKind, RuleKind, StateKind};
use crate::flow::handlers::HandlerOutcome;
use crate::protocol::EngineEvent;
use crate::state::room::Room;
use crate::store::PlayerHands;

/// The played card must match the handler's action kind.
pub(super) fn ensure_kind(card: &Card, expected: ActionKind) -> Result<(), EngineError> {
    match ActionKind::for_card(card) {
        Some(kind) if kind == expected => Ok(()),
        other => Err(EngineError::state(
            StateKind::CardMismatch,
            format!("card {} triggers {other:?}, handler expects {expected:?}", card.id),
        )),
    }
}

/// Only the initiator may pick targets, sets, and cards.
pub(super) fn ensure_initiator(
    ctx: &ActionContext,
    responder: PlayerId,
) -> Result<(), EngineError> {
    if responder == ctx.initiator {
        Ok(())
    } else {
        Err(EngineError::state(
            StateKind::WrongResponder,
            format!("only the initiator {} may answer this stage", ctx.initiator),
        ))
    }
}

pub(super) fn ensure_audience(
    ctx: &ActionContext,
    responder: PlayerId,
) -> Result<(), EngineError> {
    if ctx.audience.contains(&responder) {
        Ok(())
    } else {
        Err(EngineError::state(
            StateKind::WrongResponder,
            format!("player {responder} is not part of this dialog's audience"),
        ))
    }
}

pub(super) fn wrong_stage(ctx: &ActionContext) -> EngineError {
    EngineError::state(
        StateKind::WrongStage,
        format!("{:?} has no {:?} stage", ctx.kind, ctx.stage),
    )
}

/// Build the first-stage context for a freshly played card.
pub(super) fn open_context(
    room: &Room,
    initiator: PlayerId,
    card: &Card,
    kind: ActionKind,
    stage: DialogStage,
) -> Result<ActionContext, EngineError> {
    let audience =
        rules::identify_dialog_audience(initiator, None, &room.player_ids(), stage)?;
    Ok(ActionContext::open(initiator, card.id, kind, stage, audience))
}

/// Advance a context to `stage`, recomputing the audience for `caller`.
pub(super) fn next_stage(
    room: &Room,
    ctx: ActionContext,
    caller: PlayerId,
    target: Option<PlayerId>,
    stage: DialogStage,
) -> Result<ActionContext, EngineError> {
    let audience = rules::identify_dialog_audience(caller, target, &room.player_ids(), stage)?;
    Ok(ctx.advanced(stage, audience))
}

/// Validate and return the target the initiator picked at player selection.
pub(super) fn select_target(
    room: &Room,
    ctx: &ActionContext,
    responder: PlayerId,
) -> Result<PlayerId, EngineError> {
    ensure_initiator(ctx, responder)?;
    let target = ctx.require_target("player selection")?;
    room.ensure_player(target)?;
    if target == ctx.initiator {
        return Err(EngineError::rule(
            RuleKind::Other("self_target".into()),
            "an action cannot target its initiator",
        ));
    }
    Ok(target)
}

/// Color group a table card currently sits in.
pub(super) fn locate_table_color(
    hands: &PlayerHands,
    card_id: CardId,
) -> Result<PropertyColor, EngineError> {
    hands
        .table()
        .iter()
        .find(|(_, group)| group.iter().any(|c| c.id == card_id))
        .map(|(color, _)| *color)
        .ok_or_else(|| {
            EngineError::not_found(NotFoundKind::Card, format!("{card_id} not in table hand"))
        })
}

/// Before executing, check whether the targeted player can interrupt. If they
/// hold a defensive card (and interrupts were not already declined), divert
/// to a shields-up stage addressed only to them; otherwise run `execute`.
pub(super) fn divert_to_shield_or(
    room: &Room,
    ctx: ActionContext,
    execute: impl FnOnce(ActionContext) -> Result<HandlerOutcome, EngineError>,
) -> Result<HandlerOutcome, EngineError> {
    let target = ctx.require_target("shield check")?;
    if ctx.interrupts_enabled && ctx.kind.shieldable() {
        let shield = room
            .hands()
            .with_hands(target, |hands| Ok(rules::find_shield(hands.free())))?;
        if shield.is_some() {
            let context = next_stage(room, ctx, target, Some(target), DialogStage::ShieldsUp)?;
            return Ok(HandlerOutcome::NextStage {
                context,
                events: Vec::new(),
            });
        }
    }
    execute(ctx)
}

/// Handle a shields-up response. `resume` re-enters the original transition
/// and runs only on a declined shield, with interrupt checking disabled so
/// the flow cannot re-prompt.
pub(super) fn resolve_shields_up(
    room: &Room,
    responder: PlayerId,
    ctx: ActionContext,
    resume: impl FnOnce(ActionContext) -> Result<HandlerOutcome, EngineError>,
) -> Result<HandlerOutcome, EngineError> {
    let defender = ctx.require_target("shields-up")?;
    if responder != defender {
        return Err(EngineError::state(
            StateKind::WrongResponder,
            format!("only the targeted player {defender} may answer a shields-up dialog"),
        ));
    }

    match ctx.require_verdict("shields-up")? {
        ResponseVerdict::UseShield => {
            let shield = room
                .hands()
                .with_hands(defender, |hands| Ok(rules::find_shield(hands.free())))?
                .ok_or_else(|| {
                    EngineError::not_found(NotFoundKind::Card, "no defensive card in hand")
                })?;
            let report = room.executor().discard_and_refill_if_empty(defender, shield)?;
            info!(initiator = %ctx.initiator, %defender, kind = ?ctx.kind, "action blocked by shield");

            // The would-be victim becomes the beneficiary of the
            // cancellation for notification purposes.
            let mut events = vec![EngineEvent::ActionBlocked {
                initiator: ctx.initiator,
                defender,
                kind: ctx.kind,
            }];
            if report.refilled > 0 {
                events.push(EngineEvent::HandRefilled {
                    player: defender,
                    count: report.refilled,
                });
            }
            Ok(HandlerOutcome::Complete { events })
        }
        ResponseVerdict::Decline => {
            let mut ctx = ctx;
            ctx.interrupts_enabled = false;
            ctx.verdict = None;
            resume(ctx)
        }
        ResponseVerdict::Proceed => Err(EngineError::state(
            StateKind::WrongStage,
            "a shields-up response must use or decline the shield",
        )),
    }
}

/// Validate and execute one payer's pay-value response.
pub(super) fn collect_payment(
    room: &Room,
    payer: PlayerId,
    ctx: &ActionContext,
) -> Result<Vec<EngineEvent>, EngineError> {
    ensure_audience(ctx, payer)?;
    let owed = ctx.require_payment_value("pay value")?;

    let (selected_total, holdings_total) = room.hands().with_hands(payer, |hands| {
        Ok((
            hands.payment_value_of(&ctx.chosen_cards)?,
            hands.holdings_total(),
        ))
    })?;
    rules::ensure_payment_covers(selected_total, owed, holdings_total)?;

    let moved = if ctx.chosen_cards.is_empty() {
        Vec::new()
    } else {
        room.executor()
            .transfer_payment(payer, ctx.initiator, &ctx.chosen_cards)?
    };
    info!(
        initiator = %ctx.initiator,
        %payer,
        kind = ?ctx.kind,
        owed,
        paid = selected_total,
        "payment transferred"
    );

    let mut events = vec![EngineEvent::ActionResolved {
        initiator: ctx.initiator,
        affected: Some(payer),
        kind: ctx.kind,
        cards: moved,
    }];
    // Received table cards can complete a set.
    if let Some(win) = check_win(room, ctx.initiator)? {
        events.push(win);
    }
    Ok(events)
}

/// Resolve one queued wildcard color declaration by its new owner.
pub(super) fn handle_wildcard_color(
    room: &Room,
    responder: PlayerId,
    ctx: ActionContext,
) -> Result<HandlerOutcome, EngineError> {
    let (owner, card_id) = ctx
        .pending_wildcards
        .first()
        .copied()
        .ok_or_else(|| EngineError::invariant("no wildcard awaiting a color declaration"))?;
    if responder != owner {
        return Err(EngineError::state(
            StateKind::WrongResponder,
            format!("only the card's new owner {owner} may declare its color"),
        ));
    }
    let color = ctx.require_color("wildcard color selection")?;

    room.hands().with_hands(owner, |hands| {
        hands.table_card(card_id)?.ensure_wildcard_accepts(color)
    })?;
    room.executor().reassign_wildcard_color(owner, card_id, color)?;

    let mut events = vec![EngineEvent::WildcardAssigned {
        player: owner,
        card: card_id,
        color,
    }];
    // The re-declared color may have completed a set.
    if let Some(win) = check_win(room, owner)? {
        events.push(win);
    }

    let mut ctx = ctx;
    ctx.pending_wildcards.remove(0);
    ctx.chosen_color = None;
    open_wildcards_or_complete(room, ctx, events)
}

/// Open the next queued wildcard declaration, or finish the action.
pub(super) fn open_wildcards_or_complete(
    room: &Room,
    ctx: ActionContext,
    events: Vec<EngineEvent>,
) -> Result<HandlerOutcome, EngineError> {
    if let Some((owner, _)) = ctx.pending_wildcards.first().copied() {
        let context = next_stage(room, ctx, owner, None, DialogStage::WildcardColorSelection)?;
        Ok(HandlerOutcome::NextStage { context, events })
    } else {
        Ok(HandlerOutcome::Complete { events })
    }
}

/// Report a win once a mutation leaves `player` with enough complete sets.
pub(crate) fn check_win(
    room: &Room,
    player: PlayerId,
) -> Result<Option<EngineEvent>, EngineError> {
    let sets = room.executor().complete_set_count(player)?;
    if sets >= room.rules().sets_to_win {
        room.finish(player);
        info!(winner = %player, sets, "room won");
        return Ok(Some(EngineEvent::GameWon { winner: player }));
    }
    Ok(None)
}
