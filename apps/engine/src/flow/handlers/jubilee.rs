//! Jubilee: every other player owes the initiator a fixed amount.
//!
//! There is no single defender, so no shields-up window opens; the demand
//! goes straight to a pay-value dialog addressed to everyone else.

use crate::domain::action::{ActionContext, ActionKind, DialogStage};
use crate::domain::cards::{Card, CommandKind, PlayerId};
use crate::domain::rules;
use crate::errors::EngineError;
use crate::flow::handlers::{shared, ActionHandler, HandlerOutcome, InitializeOutcome};
use crate::state::room::Room;

pub struct JubileeHandler;

impl ActionHandler for JubileeHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Jubilee
    }

    fn initialize(
        &self,
        room: &Room,
        initiator: PlayerId,
        card: &Card,
    ) -> Result<InitializeOutcome, EngineError> {
        shared::ensure_kind(card, self.kind())?;
        let amount = match card.command_kind() {
            Some(CommandKind::Jubilee { amount }) => *amount,
            _ => {
                return Err(EngineError::invariant(
                    "jubilee handler fed a non-jubilee card",
                ))
            }
        };

        let audience = rules::identify_dialog_audience(
            initiator,
            None,
            &room.player_ids(),
            DialogStage::PayValue,
        )?;
        let mut ctx = ActionContext::open(
            initiator,
            card.id,
            self.kind(),
            DialogStage::PayValue,
            audience,
        );
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
            DialogStage::PayValue => {
                let events = shared::collect_payment(room, responder, &ctx)?;
                Ok(HandlerOutcome::Complete { events })
            }
            _ => Err(shared::wrong_stage(&ctx)),
        }
    }
}
