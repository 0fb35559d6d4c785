//! Error codes for the engine boundary.
//!
//! This module defines all error codes the engine reports to the transport
//! layer. Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings the
//! transport puts on the wire.

use core::fmt;

/// Centralized error codes for the engine boundary.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string so the
/// transport can surface failures to the offending player without inspecting
/// error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Resource not found
    /// Card absent from the expected collection
    CardNotFound,
    /// Player is not part of the room
    PlayerNotFound,
    /// Room id is not registered
    RoomNotFound,
    /// Player has no table group of the requested color
    ColorGroupNotFound,
    /// A response arrived with no action in flight
    NoPendingAction,
    /// Discard pile is empty
    DiscardEmpty,
    /// General not found error
    NotFound,

    // State mismatches
    /// Not this player's turn
    WrongTurn,
    /// Responder is not part of the current dialog audience
    WrongResponder,
    /// Response does not match the current dialog stage
    WrongStage,
    /// Played card does not match the action kind
    CardMismatch,
    /// A second action was opened while one is unresolved
    ActionAlreadyPending,
    /// Responder already submitted a response for this stage
    DuplicateResponse,
    /// Shield played outside a shields-up window
    ShieldOutsideInterrupt,
    /// Room already has a winner
    RoomFinished,
    /// General state mismatch
    StateMismatch,

    // Rule violations
    /// Operation requires a completed property set
    CompleteSetRequired,
    /// Completed property sets are immune to this operation
    CompleteSetImmune,
    /// Buildings cannot be taken individually
    BuildingNotRaidable,
    /// Hotel requires a house first
    BuildingOrder,
    /// Set already carries a building of this tier
    DuplicateBuilding,
    /// Rent demanded on a group that cannot anchor rent
    InvalidRentTarget,
    /// Payment does not cover the demand
    PaymentShort,
    /// Free hand exceeds the limit at end of turn
    HandLimitExceeded,
    /// Per-turn play budget exceeded
    PlayBudgetExceeded,
    /// Player is under a trade embargo
    Embargoed,
    /// Wildcard cannot take the requested color
    WildcardColorInvalid,
    /// Card cannot be played to the requested destination
    InvalidDestination,
    /// General rule violation
    RuleViolation,

    /// Required action-context field was absent
    InvariantViolation,
}

impl ErrorCode {
    /// Canonical string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CardNotFound => "CARD_NOT_FOUND",
            ErrorCode::PlayerNotFound => "PLAYER_NOT_FOUND",
            ErrorCode::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorCode::ColorGroupNotFound => "COLOR_GROUP_NOT_FOUND",
            ErrorCode::NoPendingAction => "NO_PENDING_ACTION",
            ErrorCode::DiscardEmpty => "DISCARD_EMPTY",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::WrongTurn => "WRONG_TURN",
            ErrorCode::WrongResponder => "WRONG_RESPONDER",
            ErrorCode::WrongStage => "WRONG_STAGE",
            ErrorCode::CardMismatch => "CARD_MISMATCH",
            ErrorCode::ActionAlreadyPending => "ACTION_ALREADY_PENDING",
            ErrorCode::DuplicateResponse => "DUPLICATE_RESPONSE",
            ErrorCode::ShieldOutsideInterrupt => "SHIELD_OUTSIDE_INTERRUPT",
            ErrorCode::RoomFinished => "ROOM_FINISHED",
            ErrorCode::StateMismatch => "STATE_MISMATCH",
            ErrorCode::CompleteSetRequired => "COMPLETE_SET_REQUIRED",
            ErrorCode::CompleteSetImmune => "COMPLETE_SET_IMMUNE",
            ErrorCode::BuildingNotRaidable => "BUILDING_NOT_RAIDABLE",
            ErrorCode::BuildingOrder => "BUILDING_ORDER",
            ErrorCode::DuplicateBuilding => "DUPLICATE_BUILDING",
            ErrorCode::InvalidRentTarget => "INVALID_RENT_TARGET",
            ErrorCode::PaymentShort => "PAYMENT_SHORT",
            ErrorCode::HandLimitExceeded => "HAND_LIMIT_EXCEEDED",
            ErrorCode::PlayBudgetExceeded => "PLAY_BUDGET_EXCEEDED",
            ErrorCode::Embargoed => "EMBARGOED",
            ErrorCode::WildcardColorInvalid => "WILDCARD_COLOR_INVALID",
            ErrorCode::InvalidDestination => "INVALID_DESTINATION",
            ErrorCode::RuleViolation => "RULE_VIOLATION",
            ErrorCode::InvariantViolation => "INVARIANT_VIOLATION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
