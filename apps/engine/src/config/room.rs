//! Per-room rule knobs.

use serde::{Deserialize, Serialize};

use crate::domain::cards::RoomId;

/// Tunable game rules for one room. `Default` carries the standard rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRules {
    /// Cards a player may play per turn.
    pub plays_per_turn: u32,
    /// Cards drawn at the start of a normal turn.
    pub turn_draw: usize,
    /// Cards drawn when a free hand empties (turn start or shield discard).
    pub refill_size: usize,
    /// Free-hand cards a player may keep at end of turn.
    pub free_hand_limit: usize,
    /// Cards dealt to each player when the room starts.
    pub initial_hand: usize,
    /// Completed sets needed to win.
    pub sets_to_win: usize,
}

impl Default for RoomRules {
    fn default() -> Self {
        Self {
            plays_per_turn: 3,
            turn_draw: 2,
            refill_size: 5,
            free_hand_limit: 7,
            initial_hand: 5,
            sets_to_win: 3,
        }
    }
}

/// Everything needed to construct a room besides the roster and the deck.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub id: RoomId,
    /// Seed for reshuffles; rooms with equal seeds and inputs replay
    /// identically.
    pub seed: [u8; 32],
    pub rules: RoomRules,
}

impl RoomConfig {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            id: RoomId::fresh(),
            seed,
            rules: RoomRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: RoomRules) -> Self {
        self.rules = rules;
        self
    }
}
