//! Draw-two: an immediate action with no dialog.

use crate::domain::action::{ActionContext, ActionKind};
use crate::domain::cards::{Card, PlayerId};
use crate::errors::{EngineError, StateKind};
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::protocol::EngineEvent;
use crate::state::room::Room;

const DRAW_COUNT: usize = 2;

pub struct DrawTwoHandler;

impl ActionHandler for DrawTwoHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::DrawTwo
    }

    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        shared::ensure_kind(card, self.kind())?;
        let drawn = room.executor().draw_cards(initiator, DRAW_COUNT)?;
        Ok(InitializeOutcome::Immediate(vec![EngineEvent::CardsDrawn {
            player: initiator,
            count: drawn.len(),
        }]))
    }

    fn process_response(
        &self,
        _room: &Room,
        _responder: PlayerId,
        _ctx: ActionContext,
    ) -> Result<HandlerOutcome, EngineError> {
        Err(EngineError::state(
            StateKind::WrongStage,
            "draw-two resolves immediately and takes no responses",
        ))
    }
}
