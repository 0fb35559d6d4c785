use std::collections::HashSet;

use crate::errors::engine::{EngineError, NotFoundKind, RuleKind, StateKind};
use crate::errors::ErrorCode;

#[test]
fn kinds_map_to_specific_codes() {
    let cases = [
        (
            EngineError::not_found(NotFoundKind::Card, "x"),
            ErrorCode::CardNotFound,
        ),
        (
            EngineError::not_found(NotFoundKind::PendingAction, "x"),
            ErrorCode::NoPendingAction,
        ),
        (
            EngineError::state(StateKind::WrongResponder, "x"),
            ErrorCode::WrongResponder,
        ),
        (
            EngineError::state(StateKind::ActionAlreadyPending, "x"),
            ErrorCode::ActionAlreadyPending,
        ),
        (
            EngineError::rule(RuleKind::CompleteSetImmune, "x"),
            ErrorCode::CompleteSetImmune,
        ),
        (
            EngineError::rule(RuleKind::PaymentShort, "x"),
            ErrorCode::PaymentShort,
        ),
        (
            EngineError::invariant("missing target"),
            ErrorCode::InvariantViolation,
        ),
    ];

    for (err, code) in cases {
        assert_eq!(err.code(), code, "wrong code for {err:?}");
    }
}

#[test]
fn other_kinds_fall_back_to_category_codes() {
    assert_eq!(
        EngineError::not_found(NotFoundKind::Other("weird".into()), "x").code(),
        ErrorCode::NotFound
    );
    assert_eq!(
        EngineError::state(StateKind::Other("weird".into()), "x").code(),
        ErrorCode::StateMismatch
    );
    assert_eq!(
        EngineError::rule(RuleKind::Other("weird".into()), "x").code(),
        ErrorCode::RuleViolation
    );
}

#[test]
fn display_includes_detail() {
    let err = EngineError::rule(RuleKind::PaymentShort, "owed 7, offered 3");
    assert!(err.to_string().contains("owed 7, offered 3"));
}

#[test]
fn canonical_code_strings_are_unique_and_screaming_snake() {
    let codes = [
        ErrorCode::CardNotFound,
        ErrorCode::PlayerNotFound,
        ErrorCode::RoomNotFound,
        ErrorCode::ColorGroupNotFound,
        ErrorCode::NoPendingAction,
        ErrorCode::DiscardEmpty,
        ErrorCode::NotFound,
        ErrorCode::WrongTurn,
        ErrorCode::WrongResponder,
        ErrorCode::WrongStage,
        ErrorCode::CardMismatch,
        ErrorCode::ActionAlreadyPending,
        ErrorCode::DuplicateResponse,
        ErrorCode::ShieldOutsideInterrupt,
        ErrorCode::RoomFinished,
        ErrorCode::StateMismatch,
        ErrorCode::CompleteSetRequired,
        ErrorCode::CompleteSetImmune,
        ErrorCode::BuildingNotRaidable,
        ErrorCode::BuildingOrder,
        ErrorCode::DuplicateBuilding,
        ErrorCode::InvalidRentTarget,
        ErrorCode::PaymentShort,
        ErrorCode::HandLimitExceeded,
        ErrorCode::PlayBudgetExceeded,
        ErrorCode::Embargoed,
        ErrorCode::WildcardColorInvalid,
        ErrorCode::InvalidDestination,
        ErrorCode::RuleViolation,
        ErrorCode::InvariantViolation,
    ];

    let mut seen = HashSet::new();
    for code in codes {
        let s = code.as_str();
        assert!(seen.insert(s), "duplicate code string {s}");
        assert!(
            s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
            "code {s} is not SCREAMING_SNAKE_CASE"
        );
    }
}
