#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Landgrab engine: the authoritative rules engine and turn/action
//! coordinator for a multiplayer property-trading card game played in
//! short-lived rooms.
//!
//! The engine is transport-agnostic: the network layer calls
//! [`GameFlowService`] from its own worker threads and delivers the returned
//! events and dialogs however it likes. All shared per-room state tolerates
//! true parallel mutation.

pub mod config;
pub mod domain;
pub mod errors;
pub mod flow;
pub mod protocol;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_bootstrap;

// Re-exports for public API
pub use config::{RoomConfig, RoomRules};
pub use domain::{
    ActionContext, ActionKind, Card, CardId, DialogStage, Player, PlayerId, PropertyColor,
    ResponseVerdict, RoomId,
};
pub use errors::{EngineError, ErrorCode};
pub use flow::{GameFlowService, PlayOutcome, ResponseOutcome, TurnOutcome};
pub use protocol::{DialogRequest, EngineEvent, PlayDestination};
pub use state::{Room, RoomPhase, RoomRegistry};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
