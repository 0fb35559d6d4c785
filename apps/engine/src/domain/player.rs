use serde::{Deserialize, Serialize};

use crate::domain::cards::PlayerId;

/// A room participant. Created when the lobby hands the roster to the engine;
/// the transport handle lives on the lobby's side of the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
}

impl Player {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::fresh(),
            display_name: display_name.into(),
        }
    }
}
