//! Shared per-room state container.

use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::config::{RoomConfig, RoomRules};
use crate::domain::cards::{Card, CardId, PlayerId, RoomId};
use crate::domain::player::Player;
use crate::errors::{EngineError, NotFoundKind, RuleKind, StateKind};
use crate::flow::executor::ActionExecutor;
use crate::flow::pending::PendingActionTracker;
use crate::flow::turn::TurnSequencer;
use crate::store::{DeckStore, HandStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Playing,
    Finished { winner: PlayerId },
}

/// One live room: roster, card stores, turn order, and the pending-action
/// slot. All fields tolerate true parallel mutation; see the store modules
/// for the lock order.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    rules: RoomRules,
    players: Vec<Player>,
    deck: DeckStore,
    hands: HandStore,
    turns: Mutex<TurnSequencer>,
    tracker: PendingActionTracker,
    phase: RwLock<RoomPhase>,
}

impl Room {
    /// Build a room from a roster and an already-validated, already-shuffled
    /// card list (the deck-content boundary).
    pub fn new(
        config: RoomConfig,
        players: Vec<Player>,
        deck_cards: Vec<Card>,
    ) -> Result<Self, EngineError> {
        if players.len() < 2 {
            return Err(EngineError::rule(
                RuleKind::Other("roster".into()),
                "a room needs at least two players",
            ));
        }

        let hands = HandStore::new();
        for player in &players {
            hands.register_player(player.id);
        }
        let order: Vec<PlayerId> = players.iter().map(|p| p.id).collect();

        Ok(Self {
            id: config.id,
            rules: config.rules,
            players,
            deck: DeckStore::new(deck_cards, config.seed),
            hands,
            turns: Mutex::new(TurnSequencer::new(order)),
            tracker: PendingActionTracker::new(),
            phase: RwLock::new(RoomPhase::Playing),
        })
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn rules(&self) -> &RoomRules {
        &self.rules
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn ensure_player(&self, player: PlayerId) -> Result<(), EngineError> {
        if self.players.iter().any(|p| p.id == player) {
            Ok(())
        } else {
            Err(EngineError::not_found(
                NotFoundKind::Player,
                format!("player {player} is not in room {}", self.id),
            ))
        }
    }

    pub fn deck(&self) -> &DeckStore {
        &self.deck
    }

    pub fn hands(&self) -> &HandStore {
        &self.hands
    }

    pub fn tracker(&self) -> &PendingActionTracker {
        &self.tracker
    }

    /// Exclusive access to the turn sequencer. Never acquire hand or deck
    /// locks before this one; the turn lock is the outermost.
    pub fn turns(&self) -> MutexGuard<'_, TurnSequencer> {
        self.turns.lock()
    }

    pub fn executor(&self) -> ActionExecutor<'_> {
        ActionExecutor::new(&self.hands, &self.deck, &self.rules)
    }

    pub fn phase(&self) -> RoomPhase {
        *self.phase.read()
    }

    pub fn ensure_playing(&self) -> Result<(), EngineError> {
        match self.phase() {
            RoomPhase::Playing => Ok(()),
            RoomPhase::Finished { winner } => Err(EngineError::state(
                StateKind::RoomFinished,
                format!("room already won by {winner}"),
            )),
        }
    }

    /// Mark the room finished. The first winner sticks.
    pub fn finish(&self, winner: PlayerId) {
        let mut phase = self.phase.write();
        if matches!(*phase, RoomPhase::Playing) {
            *phase = RoomPhase::Finished { winner };
        }
    }

    /// Ids of every card in the room (piles plus all hands). Conservation
    /// checks only.
    pub fn card_ids(&self) -> Vec<CardId> {
        let mut ids = self.deck.card_ids();
        ids.extend(self.hands.card_ids());
        ids
    }
}
