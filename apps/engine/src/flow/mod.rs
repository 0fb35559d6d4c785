//! The interactive action-resolution core: turn sequencing, the pending
//! action slot, handlers, the executor, and the inbound service boundary.

pub mod coordinator;
pub mod executor;
pub mod handlers;
pub mod pending;
pub mod turn;

use std::collections::HashSet;

use tracing::{debug, info};

use crate::domain::action::{ActionContext, ActionKind};
use crate::domain::cards::{Card, CardId, PlayerId, PropertyColor};
use crate::domain::snapshot::PlayerHandsSnapshot;
use crate::errors::{EngineError, NotFoundKind, RuleKind, StateKind};
use crate::protocol::{DialogRequest, EngineEvent, PlayDestination};
use crate::state::room::Room;

pub use coordinator::DrainOutcome;
pub use executor::{ActionExecutor, RefillReport, TradeReport};
pub use handlers::{ActionHandler, HandlerOutcome, HandlerRegistry, InitializeOutcome};
pub use pending::{PendingAction, PendingActionTracker};
pub use turn::TurnSequencer;

/// Result of playing a turn card: the dialog to present (if the action needs
/// responses) and the events produced so far.
#[derive(Debug)]
pub struct PlayOutcome {
    pub dialog: Option<DialogRequest>,
    pub events: Vec<EngineEvent>,
}

/// Result of registering an action response.
#[derive(Debug)]
pub struct ResponseOutcome {
    /// Further dialogs to present, each addressed to its own audience.
    pub dialogs: Vec<DialogRequest>,
    pub events: Vec<EngineEvent>,
    /// The action fully resolved with this registration.
    pub action_resolved: bool,
}

/// Result of ending a turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub events: Vec<EngineEvent>,
}

/// The inbound boundary of the engine. One instance serves every room; all
/// room state lives in the [`Room`] passed per call.
#[derive(Debug)]
pub struct GameFlowService {
    registry: HandlerRegistry,
}

impl Default for GameFlowService {
    fn default() -> Self {
        Self::new()
    }
}

impl GameFlowService {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::standard(),
        }
    }

    /// Deal each player their opening hand.
    pub fn deal_initial(&self, room: &Room) -> Result<Vec<EngineEvent>, EngineError> {
        let executor = room.executor();
        let mut events = Vec::new();
        for player in room.player_ids() {
            let drawn = executor.draw_cards(player, room.rules().initial_hand)?;
            events.push(EngineEvent::CardsDrawn {
                player,
                count: drawn.len(),
            });
        }
        info!(room_id = %room.id(), players = room.players().len(), "initial hands dealt");
        Ok(events)
    }

    /// Play a card from the current player's free hand to the bank, the
    /// table, or the action slot.
    pub fn play_turn_card(
        &self,
        room: &Room,
        player: PlayerId,
        card_id: CardId,
        destination: PlayDestination,
        color_hint: Option<PropertyColor>,
    ) -> Result<PlayOutcome, EngineError> {
        room.ensure_playing()?;
        room.ensure_player(player)?;
        {
            let turns = room.turns();
            turns.ensure_turn(player)?;
            turns.ensure_can_play(room.rules().plays_per_turn)?;
        }
        if room.tracker().is_active() {
            return Err(EngineError::state(
                StateKind::ActionAlreadyPending,
                "resolve the open dialog first",
            ));
        }

        let card = room.hands().with_hands(player, |hands| {
            hands
                .free()
                .iter()
                .find(|c| c.id == card_id)
                .cloned()
                .ok_or_else(|| {
                    EngineError::not_found(
                        NotFoundKind::Card,
                        format!("{card_id} not in free hand"),
                    )
                })
        })?;
        debug!(room_id = %room.id(), %player, %card_id, ?destination, "turn card played");

        let outcome = match destination {
            PlayDestination::Bank => self.play_to_bank(room, player, &card)?,
            PlayDestination::Table => self.play_to_table(room, player, &card, color_hint)?,
            PlayDestination::Action => self.play_action(room, player, &card)?,
        };

        // Budget was checked up front; concurrent plays by the same player
        // may interleave between check and spend.
        room.turns().note_play();
        Ok(outcome)
    }

    fn play_to_bank(
        &self,
        room: &Room,
        player: PlayerId,
        card: &Card,
    ) -> Result<PlayOutcome, EngineError> {
        if card.counts_toward_set() {
            return Err(EngineError::rule(
                RuleKind::InvalidDestination,
                "property cards cannot be banked",
            ));
        }
        room.hands().with_hands(player, |hands| {
            let card = hands.remove_free(card.id)?;
            hands.add_bank(card);
            Ok(())
        })?;
        Ok(PlayOutcome {
            dialog: None,
            events: vec![EngineEvent::CardPlayed {
                player,
                card: card.id,
                destination: PlayDestination::Bank,
            }],
        })
    }

    fn play_to_table(
        &self,
        room: &Room,
        player: PlayerId,
        card: &Card,
        color_hint: Option<PropertyColor>,
    ) -> Result<PlayOutcome, EngineError> {
        let color = if let Some(color) = card.property_color() {
            color
        } else if card.wildcard_scope().is_some() {
            let hint = color_hint.ok_or_else(|| {
                EngineError::rule(
                    RuleKind::WildcardColorInvalid,
                    "a wildcard needs a color to join",
                )
            })?;
            card.ensure_wildcard_accepts(hint)?;
            hint
        } else {
            return Err(EngineError::rule(
                RuleKind::InvalidDestination,
                "only property cards join the table",
            ));
        };

        room.hands().with_hands(player, |hands| {
            let card = hands.remove_free(card.id)?;
            hands.add_to_table(color, card);
            Ok(())
        })?;

        let mut events = vec![EngineEvent::CardPlayed {
            player,
            card: card.id,
            destination: PlayDestination::Table,
        }];
        if let Some(win) = handlers::shared::check_win(room, player)? {
            events.push(win);
        }
        Ok(PlayOutcome {
            dialog: None,
            events,
        })
    }

    fn play_action(
        &self,
        room: &Room,
        player: PlayerId,
        card: &Card,
    ) -> Result<PlayOutcome, EngineError> {
        let kind = ActionKind::for_card(card).ok_or_else(|| {
            EngineError::rule(RuleKind::InvalidDestination, "this card has no action effect")
        })?;
        let handler = self.registry.get(kind)?;

        match handler.initialize(room, player, card)? {
            InitializeOutcome::Dialog(ctx) => {
                room.tracker().set_current(PendingAction::open(&ctx))?;
                // Effect cards are spent when played; building cards stay in
                // the free hand until the executor moves them onto a set.
                if !kind.is_building() {
                    self.spend_card(room, player, card.id)?;
                }
                Ok(PlayOutcome {
                    dialog: Some(DialogRequest::from(ctx)),
                    events: vec![EngineEvent::CardPlayed {
                        player,
                        card: card.id,
                        destination: PlayDestination::Action,
                    }],
                })
            }
            InitializeOutcome::Immediate(produced) => {
                self.spend_card(room, player, card.id)?;
                let mut events = vec![EngineEvent::CardPlayed {
                    player,
                    card: card.id,
                    destination: PlayDestination::Action,
                }];
                events.extend(produced);
                Ok(PlayOutcome {
                    dialog: None,
                    events,
                })
            }
        }
    }

    fn spend_card(
        &self,
        room: &Room,
        player: PlayerId,
        card_id: CardId,
    ) -> Result<(), EngineError> {
        room.hands().with_hands(player, |hands| {
            let card = hands.remove_free(card_id)?;
            room.deck().discard(card);
            Ok(())
        })
    }

    /// Register a player's response to the current dialog, draining the inbox
    /// once the audience is complete.
    pub fn register_action_response(
        &self,
        room: &Room,
        responder: PlayerId,
        ctx: ActionContext,
    ) -> Result<ResponseOutcome, EngineError> {
        room.ensure_playing()?;
        let outcome = coordinator::register_response(room, &self.registry, responder, ctx)?;
        Ok(ResponseOutcome {
            dialogs: outcome
                .new_contexts
                .into_iter()
                .map(DialogRequest::from)
                .collect(),
            events: outcome.events,
            action_resolved: outcome.should_clear,
        })
    }

    /// Discard down to the hand limit, rotate the turn, and draw for the next
    /// player.
    pub fn end_turn(
        &self,
        room: &Room,
        player: PlayerId,
        discards: &[CardId],
    ) -> Result<TurnOutcome, EngineError> {
        room.ensure_playing()?;
        room.ensure_player(player)?;
        if room.tracker().is_active() {
            return Err(EngineError::state(
                StateKind::ActionAlreadyPending,
                "resolve the open dialog before ending the turn",
            ));
        }
        let mut turns = room.turns();
        turns.ensure_turn(player)?;

        // Validate the whole discard list before touching anything.
        room.hands().with_hands(player, |hands| {
            let mut seen = HashSet::new();
            for &id in discards {
                if !seen.insert(id) {
                    return Err(EngineError::invariant(format!(
                        "card {id} listed twice in discards"
                    )));
                }
                if !hands.free().iter().any(|c| c.id == id) {
                    return Err(EngineError::not_found(
                        NotFoundKind::Card,
                        format!("{id} not in free hand"),
                    ));
                }
            }
            let kept = hands.free().len() - discards.len();
            if kept > room.rules().free_hand_limit {
                return Err(EngineError::rule(
                    RuleKind::HandLimitExceeded,
                    format!(
                        "keeping {kept} cards, limit is {}",
                        room.rules().free_hand_limit
                    ),
                ));
            }
            Ok(())
        })?;

        if !discards.is_empty() {
            room.hands().with_hands(player, |hands| {
                for &id in discards {
                    let card = hands.remove_free(id)?;
                    room.deck().discard(card);
                }
                Ok(())
            })?;
        }

        let next = turns.advance();
        // Turn-start draw: the standard two, or a full refill on an empty
        // hand.
        let empty = room
            .hands()
            .with_hands(next, |hands| Ok(hands.free().is_empty()))?;
        let count = if empty {
            room.rules().refill_size
        } else {
            room.rules().turn_draw
        };
        let drawn = room.executor().draw_cards(next, count)?;
        info!(room_id = %room.id(), %player, next_player = %next, "turn ended");

        Ok(TurnOutcome {
            events: vec![
                EngineEvent::TurnEnded {
                    player,
                    next_player: next,
                },
                EngineEvent::CardsDrawn {
                    player: next,
                    count: drawn.len(),
                },
            ],
        })
    }

    /// Per-player hand view for the transport.
    pub fn hand_snapshot(
        &self,
        room: &Room,
        player: PlayerId,
    ) -> Result<PlayerHandsSnapshot, EngineError> {
        room.ensure_player(player)?;
        room.hands().snapshot(player)
    }
}
