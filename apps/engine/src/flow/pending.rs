//! The live record of an in-flight multi-step action.
//!
//! One pending action per room at a time. A card action that needs a response
//! does not block a thread: it parks its state here and returns; the next
//! relevant player's request thread resumes it through the coordinator.

use parking_lot::Mutex;

use crate::domain::action::{ActionContext, ActionKind, DialogStage, ResponseVerdict};
use crate::domain::cards::PlayerId;
use crate::errors::{EngineError, NotFoundKind, StateKind};

/// Bookkeeping for one in-flight action.
#[derive(Debug)]
pub struct PendingAction {
    initiator: PlayerId,
    kind: ActionKind,
    stage: DialogStage,
    /// Everyone who must respond before the current stage can resolve.
    required: Vec<PlayerId>,
    /// Required responders that have not submitted yet.
    remaining: Vec<PlayerId>,
    /// Responses processed by the coordinator so far.
    processed: usize,
    /// Queued (responder, context) pairs awaiting the drain, arrival order.
    inbox: Vec<(PlayerId, ActionContext)>,
    /// Dialog step index, advanced once per stage change.
    step: u32,
    /// Set when a shield response arrived; the drain starts without waiting
    /// for the remaining responders.
    short_circuited: bool,
}

impl PendingAction {
    /// Open the record for a freshly initialized action context.
    pub fn open(ctx: &ActionContext) -> Self {
        Self {
            initiator: ctx.initiator,
            kind: ctx.kind,
            stage: ctx.stage,
            required: ctx.audience.clone(),
            remaining: ctx.audience.clone(),
            processed: 0,
            inbox: Vec::new(),
            step: 0,
            short_circuited: false,
        }
    }

    pub fn initiator(&self) -> PlayerId {
        self.initiator
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn stage(&self) -> DialogStage {
        self.stage
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    fn resolvable(&self) -> bool {
        self.processed >= self.required.len()
    }
}

/// Thread-safe holder of the room's single pending-action slot.
#[derive(Debug, Default)]
pub struct PendingActionTracker {
    current: Mutex<Option<PendingAction>>,
}

impl PendingActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new pending action. Guards against overlapping actions in
    /// one room: fails while an unresolved action is active.
    pub fn set_current(&self, action: PendingAction) -> Result<(), EngineError> {
        let mut current = self.current.lock();
        if current.is_some() {
            return Err(EngineError::state(
                StateKind::ActionAlreadyPending,
                "another action is still unresolved",
            ));
        }
        *current = Some(action);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Append a response to the inbox. Returns whether the inbox should now
    /// be drained: every required responder has submitted exactly one
    /// response, or a shield interrupt short-circuits the count.
    pub fn enqueue_response(
        &self,
        player: PlayerId,
        ctx: ActionContext,
    ) -> Result<bool, EngineError> {
        let mut current = self.current.lock();
        let action = current.as_mut().ok_or_else(no_pending_action)?;

        if ctx.kind != action.kind {
            return Err(EngineError::state(
                StateKind::CardMismatch,
                format!("response is for {:?}, pending action is {:?}", ctx.kind, action.kind),
            ));
        }
        if ctx.stage != action.stage {
            return Err(EngineError::state(
                StateKind::WrongStage,
                format!("response is for {:?}, dialog is at {:?}", ctx.stage, action.stage),
            ));
        }
        if !action.required.contains(&player) {
            return Err(EngineError::state(
                StateKind::WrongResponder,
                format!("player {player} is not part of this dialog's audience"),
            ));
        }
        match action.remaining.iter().position(|p| *p == player) {
            Some(pos) => {
                action.remaining.remove(pos);
            }
            None => {
                return Err(EngineError::state(
                    StateKind::DuplicateResponse,
                    format!("player {player} already responded to this stage"),
                ));
            }
        }

        if ctx.verdict == Some(ResponseVerdict::UseShield) {
            action.short_circuited = true;
        }
        action.inbox.push((player, ctx));

        Ok(action.short_circuited || action.remaining.is_empty())
    }

    /// Take the queued responses, preserving arrival order.
    pub fn take_inbox(&self) -> Result<Vec<(PlayerId, ActionContext)>, EngineError> {
        let mut current = self.current.lock();
        let action = current.as_mut().ok_or_else(no_pending_action)?;
        Ok(std::mem::take(&mut action.inbox))
    }

    /// Put unprocessed responses back at the front of the inbox, ahead of
    /// anything queued meanwhile.
    pub fn restore_inbox(
        &self,
        items: Vec<(PlayerId, ActionContext)>,
    ) -> Result<(), EngineError> {
        let mut current = self.current.lock();
        let action = current.as_mut().ok_or_else(no_pending_action)?;
        let tail = std::mem::take(&mut action.inbox);
        action.inbox = items;
        action.inbox.extend(tail);
        Ok(())
    }

    /// Re-arm the stage for a responder whose response failed validation, so
    /// they can resubmit.
    pub fn reject_response(&self, player: PlayerId) {
        let mut current = self.current.lock();
        if let Some(action) = current.as_mut() {
            if action.required.contains(&player) && !action.remaining.contains(&player) {
                action.remaining.push(player);
            }
        }
    }

    pub fn mark_processed(&self) -> Result<(), EngineError> {
        let mut current = self.current.lock();
        let action = current.as_mut().ok_or_else(no_pending_action)?;
        action.processed += 1;
        Ok(())
    }

    pub fn is_resolvable(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .map(PendingAction::resolvable)
            .unwrap_or(false)
    }

    /// Move the record to the context's (already recomputed) stage and
    /// audience. Counters and inbox reset; the step index advances.
    pub fn advance_stage(&self, ctx: &ActionContext) -> Result<(), EngineError> {
        let mut current = self.current.lock();
        let action = current.as_mut().ok_or_else(no_pending_action)?;
        action.stage = ctx.stage;
        action.required = ctx.audience.clone();
        action.remaining = ctx.audience.clone();
        action.processed = 0;
        action.inbox.clear();
        action.step += 1;
        action.short_circuited = false;
        Ok(())
    }

    pub fn clear(&self) {
        *self.current.lock() = None;
    }

    /// Read a field of the current action. Callers must check liveness via
    /// room state rather than assume presence.
    pub fn with_current<R>(
        &self,
        f: impl FnOnce(&PendingAction) -> R,
    ) -> Result<R, EngineError> {
        let current = self.current.lock();
        let action = current.as_ref().ok_or_else(no_pending_action)?;
        Ok(f(action))
    }
}

fn no_pending_action() -> EngineError {
    EngineError::not_found(NotFoundKind::PendingAction, "no pending action in this room")
}
