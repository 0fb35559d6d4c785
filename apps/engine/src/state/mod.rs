//! Room state container and registry.

pub mod registry;
pub mod room;

pub use registry::RoomRegistry;
pub use room::{Room, RoomPhase};
