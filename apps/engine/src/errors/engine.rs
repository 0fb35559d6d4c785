//! Engine-level error type used across stores, handlers, and the flow layer.
//!
//! This error type is transport-agnostic. Every violation is recoverable at
//! the request boundary: validation strictly precedes mutation, so an error
//! aborts only the offending request and leaves room state unchanged.

use thiserror::Error;

use crate::errors::ErrorCode;

/// Entities that can be missing in engine terms.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Card,
    Player,
    Room,
    ColorGroup,
    PendingAction,
    DiscardEmpty,
    Other(String),
}

/// State-mismatch kinds: the request is well-formed but arrived at a moment
/// or from a player the current room state does not permit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateKind {
    WrongTurn,
    WrongResponder,
    WrongStage,
    CardMismatch,
    ActionAlreadyPending,
    DuplicateResponse,
    ShieldOutsideInterrupt,
    RoomFinished,
    Other(String),
}

/// Game-rule violations: the request targets a legal moment but asks for
/// something the rules forbid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuleKind {
    CompleteSetRequired,
    CompleteSetImmune,
    BuildingNotRaidable,
    BuildingOrder,
    DuplicateBuilding,
    InvalidRentTarget,
    PaymentShort,
    HandLimitExceeded,
    PlayBudgetExceeded,
    Embargoed,
    WildcardColorInvalid,
    InvalidDestination,
    Other(String),
}

/// Central engine error type.
///
/// Kinds, not concrete types, carry the taxonomy: the transport layer maps a
/// kind to a user-facing message via [`ErrorCode`] without string inspection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Missing resource (card / player / hand group / pending action / room).
    #[error("not found {kind:?}: {detail}")]
    NotFound { kind: NotFoundKind, detail: String },

    /// Wrong responder, wrong turn, wrong dialog stage, card type mismatch.
    #[error("state mismatch {kind:?}: {detail}")]
    State { kind: StateKind, detail: String },

    /// Rule violation for an otherwise well-timed request.
    #[error("rule violation {kind:?}: {detail}")]
    Rule { kind: RuleKind, detail: String },

    /// A required field was absent on an action context. Indicates a flow
    /// programming error rather than bad player input.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl EngineError {
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            detail: detail.into(),
        }
    }

    pub fn state(kind: StateKind, detail: impl Into<String>) -> Self {
        Self::State {
            kind,
            detail: detail.into(),
        }
    }

    pub fn rule(kind: RuleKind, detail: impl Into<String>) -> Self {
        Self::Rule {
            kind,
            detail: detail.into(),
        }
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }

    /// Stable transport-facing code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::NotFound { kind, .. } => match kind {
                NotFoundKind::Card => ErrorCode::CardNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
                NotFoundKind::Room => ErrorCode::RoomNotFound,
                NotFoundKind::ColorGroup => ErrorCode::ColorGroupNotFound,
                NotFoundKind::PendingAction => ErrorCode::NoPendingAction,
                NotFoundKind::DiscardEmpty => ErrorCode::DiscardEmpty,
                NotFoundKind::Other(_) => ErrorCode::NotFound,
            },
            EngineError::State { kind, .. } => match kind {
                StateKind::WrongTurn => ErrorCode::WrongTurn,
                StateKind::WrongResponder => ErrorCode::WrongResponder,
                StateKind::WrongStage => ErrorCode::WrongStage,
                StateKind::CardMismatch => ErrorCode::CardMismatch,
                StateKind::ActionAlreadyPending => ErrorCode::ActionAlreadyPending,
                StateKind::DuplicateResponse => ErrorCode::DuplicateResponse,
                StateKind::ShieldOutsideInterrupt => ErrorCode::ShieldOutsideInterrupt,
                StateKind::RoomFinished => ErrorCode::RoomFinished,
                StateKind::Other(_) => ErrorCode::StateMismatch,
            },
            EngineError::Rule { kind, .. } => match kind {
                RuleKind::CompleteSetRequired => ErrorCode::CompleteSetRequired,
                RuleKind::CompleteSetImmune => ErrorCode::CompleteSetImmune,
                RuleKind::BuildingNotRaidable => ErrorCode::BuildingNotRaidable,
                RuleKind::BuildingOrder => ErrorCode::BuildingOrder,
                RuleKind::DuplicateBuilding => ErrorCode::DuplicateBuilding,
                RuleKind::InvalidRentTarget => ErrorCode::InvalidRentTarget,
                RuleKind::PaymentShort => ErrorCode::PaymentShort,
                RuleKind::HandLimitExceeded => ErrorCode::HandLimitExceeded,
                RuleKind::PlayBudgetExceeded => ErrorCode::PlayBudgetExceeded,
                RuleKind::Embargoed => ErrorCode::Embargoed,
                RuleKind::WildcardColorInvalid => ErrorCode::WildcardColorInvalid,
                RuleKind::InvalidDestination => ErrorCode::InvalidDestination,
                RuleKind::Other(_) => ErrorCode::RuleViolation,
            },
            EngineError::Invariant(_) => ErrorCode::InvariantViolation,
        }
    }
}
