//! The dialog coordinator: the only place an action transitions across steps.

use tracing::debug;

use crate::domain::action::ActionContext;
use crate::domain::cards::PlayerId;
use crate::errors::EngineError;
use crate::flow::handlers::{HandlerOutcome, HandlerRegistry};
use crate::protocol::EngineEvent;
use crate::state::room::Room;

/// Result bundle of a response registration.
#[derive(Debug, Default)]
pub struct DrainOutcome {
    /// The pending action fully resolved and was cleared.
    pub should_clear: bool,
    /// Further dialog stages the handlers produced.
    pub new_contexts: Vec<ActionContext>,
    pub events: Vec<EngineEvent>,
}

/// Register one player's response; when the tracker signals that the inbox is
/// ready, drain it in arrival order and dispatch each queued response to the
/// responsible handler. The pending action is cleared if and only if the
/// tracker reports it fully resolved.
pub fn register_response(
    room: &Room,
    registry: &HandlerRegistry,
    responder: PlayerId,
    ctx: ActionContext,
) -> Result<DrainOutcome, EngineError> {
    room.ensure_player(responder)?;
    let ready = room.tracker().enqueue_response(responder, ctx)?;
    if !ready {
        debug!(room_id = %room.id(), %responder, "response queued, waiting for the rest of the audience");
        return Ok(DrainOutcome::default());
    }
    drain(room, registry)
}

fn drain(room: &Room, registry: &HandlerRegistry) -> Result<DrainOutcome, EngineError> {
    let inbox = room.tracker().take_inbox()?;
    debug!(room_id = %room.id(), responses = inbox.len(), "draining response inbox");

    let mut new_contexts = Vec::new();
    let mut events = Vec::new();

    for (position, (responder, queued)) in inbox.iter().enumerate() {
        // Clone before mutation: the queued copy stays pristine for any
        // in-flight reader of the inbox.
        let working = queued.clone();
        let handler = registry.get(working.kind)?;

        match handler.process_response(room, *responder, working) {
            Ok(HandlerOutcome::NextStage {
                context,
                events: mut produced,
            }) => {
                room.tracker().advance_stage(&context)?;
                events.append(&mut produced);
                new_contexts.push(context);
            }
            Ok(HandlerOutcome::Complete {
                events: mut produced,
            }) => {
                room.tracker().mark_processed()?;
                events.append(&mut produced);
            }
            Err(err) => {
                // The violation aborts only this response: put the
                // unprocessed remainder back and re-arm the offender so they
                // can resubmit.
                room.tracker().restore_inbox(inbox[position + 1..].to_vec())?;
                room.tracker().reject_response(*responder);
                return Err(err);
            }
        }
    }

    let should_clear = room.tracker().is_resolvable();
    if should_clear {
        room.tracker().clear();
    }
    Ok(DrainOutcome {
        should_clear,
        new_contexts,
        events,
    })
}
