//! The defensive card. Never playable on its own: it is consumed inside the
//! shields-up window of whichever hostile action it cancels.

use crate::domain::action::{ActionContext, ActionKind};
use crate::domain::cards::{Card, PlayerId};
use crate::errors::{EngineError, StateKind};
use crate::flow::handlers::{ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::state::room::Room;

pub struct ShieldHandler;

impl ActionHandler for ShieldHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Shield
    }

    fn initialize(
        &self,
        _room: &Room,
        _initiator: PlayerId,
        _card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        Err(EngineError::state(
            StateKind::ShieldOutsideInterrupt,
            "a defensive card is only playable inside a shields-up window",
        ))
    }

    fn process_response(
        &self,
        _room: &Room,
        _responder: PlayerId,
        _ctx: ActionContext,
    ) -> Result<HandlerOutcome, EngineError> {
        Err(EngineError::state(
            StateKind::ShieldOutsideInterrupt,
            "a defensive card is only playable inside a shields-up window",
        ))
    }
}
