//! Rotating turn order, per-turn play budget, and embargo bookkeeping.

use crate::domain::cards::PlayerId;
use crate::errors::{EngineError, RuleKind, StateKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Embargo {
    target: PlayerId,
    issued_by: PlayerId,
}

/// Whose turn it is and how much of it has been spent. Lives behind the
/// room's turn lock (the outermost lock; never acquired while holding hand or
/// deck locks).
#[derive(Debug)]
pub struct TurnSequencer {
    order: Vec<PlayerId>,
    current: usize,
    plays_made: u32,
    turn_no: u64,
    embargoes: Vec<Embargo>,
}

impl TurnSequencer {
    pub fn new(order: Vec<PlayerId>) -> Self {
        debug_assert!(!order.is_empty());
        Self {
            order,
            current: 0,
            plays_made: 0,
            turn_no: 1,
            embargoes: Vec::new(),
        }
    }

    pub fn current_player(&self) -> PlayerId {
        self.order[self.current]
    }

    pub fn turn_no(&self) -> u64 {
        self.turn_no
    }

    pub fn plays_made(&self) -> u32 {
        self.plays_made
    }

    pub fn ensure_turn(&self, player: PlayerId) -> Result<(), EngineError> {
        if self.current_player() == player {
            Ok(())
        } else {
            Err(EngineError::state(
                StateKind::WrongTurn,
                format!("it is {}'s turn", self.current_player()),
            ))
        }
    }

    /// Check the play budget without spending it. Validation precedes
    /// execution; call [`Self::note_play`] once the play succeeded.
    pub fn ensure_can_play(&self, limit: u32) -> Result<(), EngineError> {
        if self.plays_made >= limit {
            return Err(EngineError::rule(
                RuleKind::PlayBudgetExceeded,
                format!("{limit} cards already played this turn"),
            ));
        }
        Ok(())
    }

    pub fn note_play(&mut self) {
        self.plays_made += 1;
    }

    /// Rotate to the next player. Embargoes the new current player issued
    /// expire now.
    pub fn advance(&mut self) -> PlayerId {
        self.current = (self.current + 1) % self.order.len();
        self.plays_made = 0;
        self.turn_no += 1;
        let fresh = self.current_player();
        self.embargoes.retain(|e| e.issued_by != fresh);
        fresh
    }

    pub fn impose_embargo(&mut self, target: PlayerId, issued_by: PlayerId) {
        self.embargoes.push(Embargo { target, issued_by });
    }

    pub fn is_embargoed(&self, player: PlayerId) -> bool {
        self.embargoes.iter().any(|e| e.target == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<PlayerId> {
        (0..n).map(|_| PlayerId::fresh()).collect()
    }

    #[test]
    fn rotation_wraps_around() {
        let players = roster(3);
        let mut turns = TurnSequencer::new(players.clone());
        assert_eq!(turns.current_player(), players[0]);
        assert_eq!(turns.advance(), players[1]);
        assert_eq!(turns.advance(), players[2]);
        assert_eq!(turns.advance(), players[0]);
        assert_eq!(turns.turn_no(), 4);
    }

    #[test]
    fn wrong_turn_is_rejected() {
        let players = roster(2);
        let turns = TurnSequencer::new(players.clone());
        assert!(turns.ensure_turn(players[0]).is_ok());
        let err = turns.ensure_turn(players[1]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::State {
                kind: StateKind::WrongTurn,
                ..
            }
        ));
    }

    #[test]
    fn play_budget_is_enforced_and_reset_on_advance() {
        let players = roster(2);
        let mut turns = TurnSequencer::new(players);
        for _ in 0..3 {
            turns.ensure_can_play(3).unwrap();
            turns.note_play();
        }
        let err = turns.ensure_can_play(3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rule {
                kind: RuleKind::PlayBudgetExceeded,
                ..
            }
        ));

        turns.advance();
        assert!(turns.ensure_can_play(3).is_ok());
        assert_eq!(turns.plays_made(), 0);
    }

    #[test]
    fn embargo_expires_when_the_issuer_turn_begins() {
        let players = roster(3);
        let mut turns = TurnSequencer::new(players.clone());

        // players[0] embargoes players[2].
        turns.impose_embargo(players[2], players[0]);
        assert!(turns.is_embargoed(players[2]));

        turns.advance(); // players[1]
        assert!(turns.is_embargoed(players[2]));
        turns.advance(); // players[2]
        assert!(turns.is_embargoed(players[2]));
        turns.advance(); // players[0] again: embargo expires
        assert!(!turns.is_embargoed(players[2]));
    }
}
