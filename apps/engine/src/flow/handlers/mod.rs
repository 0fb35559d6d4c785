//! One handler per action kind.
//!
//! Handlers are the state-machine transition logic: `initialize` opens the
//! first dialog (or executes an immediate effect inline), `process_response`
//! switches on the context's current stage and either advances to a further
//! stage or calls the executor and completes. Handlers never talk to each
//! other; only the coordinator moves an action across steps.

mod build;
mod draw_two;
mod embargo;
mod jubilee;
mod levy;
mod raid;
pub(crate) mod shared;
mod shield;
mod takeover;
mod trade;
mod tribute;

use std::collections::HashMap;

use crate::domain::action::{ActionContext, ActionKind};
use crate::domain::cards::{Card, PlayerId};
use crate::errors::EngineError;
use crate::protocol::EngineEvent;
use crate::state::room::Room;

/// What `initialize` produced: a first-stage dialog, or the events of an
/// effect that needed no responses and already executed.
#[derive(Debug)]
pub enum InitializeOutcome {
    Dialog(ActionContext),
    Immediate(Vec<EngineEvent>),
}

/// What a single processed response produced.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// The action advanced to a further dialog stage.
    NextStage {
        context: ActionContext,
        events: Vec<EngineEvent>,
    },
    /// This response's share of the action is done.
    Complete { events: Vec<EngineEvent> },
}

pub trait ActionHandler: Send + Sync {
    fn kind(&self) -> ActionKind;

    /// Validate the played card, compute the first dialog audience, and
    /// return the first-stage context, or execute an immediate effect
    /// inline and return its events.
    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError>;

    /// Handle one queued response for this action.
    fn process_response(
        &self,
        room: &Room,
        responder: PlayerId,
        ctx: ActionContext,
    ) -> Result<HandlerOutcome, EngineError>;
}

/// Table of transition logic keyed by action kind.
pub struct HandlerRegistry {
    handlers: HashMap<ActionKind, Box<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// The full standard-rules handler set.
    pub fn standard() -> Self {
        let handlers: Vec<Box<dyn ActionHandler>> = vec![
            Box::new(draw_two::DrawTwoHandler),
            Box::new(takeover::HostileTakeoverHandler),
            Box::new(raid::PirateRaidHandler),
            Box::new(trade::ForcedTradeHandler),
            Box::new(tribute::TributeHandler),
            Box::new(tribute::TargetedTributeHandler),
            Box::new(levy::LevyHandler),
            Box::new(jubilee::JubileeHandler),
            Box::new(build::BuildHandler::house()),
            Box::new(build::BuildHandler::hotel()),
            Box::new(embargo::TradeEmbargoHandler),
            Box::new(shield::ShieldHandler),
        ];
        Self {
            handlers: handlers.into_iter().map(|h| (h.kind(), h)).collect(),
        }
    }

    pub fn get(&self, kind: ActionKind) -> Result<&dyn ActionHandler, EngineError> {
        self.handlers
            .get(&kind)
            .map(|h| h.as_ref())
            .ok_or_else(|| EngineError::invariant(format!("no handler registered for {kind:?}")))
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
