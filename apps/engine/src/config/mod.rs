//! Engine configuration.

pub mod room;

pub use room::{RoomConfig, RoomRules};
