//! Pure state transition function
//!
//! Presence: hellos go out on every tick until the peer's hello (or any
//! index from it) arrives; the first one flips the node to `Live` and is
//! answered once. Turns: an inbound index `i` means the peer just spoke
//! line `i`, so this node speaks `i + 1` (or line 0 after a pause once the
//! script is exhausted) and announces that index back.

use super::{Effect, Event, NodeContext, NodeState};
use crate::wire::{Malformed, Payload};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: NodeState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: NodeState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Events that are dropped without changing anything
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("malformed payload: {0}")]
    MalformedPayload(Malformed),
    #[error("message on unexpected topic {0}")]
    ForeignTopic(String),
}

/// Where the conversation goes after the peer spoke a given line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTurn {
    Line(usize),
    /// Script exhausted; pause, then start again at line 0
    Restart,
}

pub fn next_turn(received: usize, conversation_len: usize) -> NextTurn {
    match received.checked_add(1) {
        Some(next) if next < conversation_len => NextTurn::Line(next),
        _ => NextTurn::Restart,
    }
}

/// Pure transition function
pub fn transition(
    state: NodeState,
    context: &NodeContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        (state, Event::Connected) => Ok(TransitionResult::new(state).with_effect(
            Effect::Subscribe {
                topic: context.own_topic.clone(),
            },
        )),

        (NodeState::AwaitingPeer, Event::HelloTick) => {
            Ok(TransitionResult::new(NodeState::AwaitingPeer)
                .with_effect(Effect::to_peer(context, Payload::Hello)))
        }

        // A tick that raced the handshake
        (NodeState::Live, Event::HelloTick) => Ok(TransitionResult::new(NodeState::Live)),

        (state, Event::MessageReceived { topic, payload }) => {
            if topic != context.own_topic.as_str() {
                return Err(TransitionError::ForeignTopic(topic));
            }

            let payload = Payload::decode(&payload).map_err(TransitionError::MalformedPayload)?;

            Ok(match (state, payload) {
                (NodeState::AwaitingPeer, Payload::Hello) => peer_came_online(context),
                (NodeState::Live, Payload::Hello) => TransitionResult::new(NodeState::Live),
                // An index can only come from a peer that is already talking:
                // it proves presence, but the opening line has been spoken.
                (_, Payload::Index(received)) => take_turn(context, received),
            })
        }
    }
}

fn peer_came_online(context: &NodeContext) -> TransitionResult {
    let result = TransitionResult::new(NodeState::Live)
        .with_effect(Effect::to_peer(context, Payload::Hello));

    if context.opens_conversation() {
        result.with_effects(speak_and_announce(context, 0))
    } else {
        result
    }
}

fn take_turn(context: &NodeContext, received: usize) -> TransitionResult {
    let result = TransitionResult::new(NodeState::Live);

    match next_turn(received, context.conversation.len()) {
        NextTurn::Line(next) => result.with_effects(speak_and_announce(context, next)),
        NextTurn::Restart => result
            .with_effect(Effect::Pause {
                delay: context.restart_delay,
            })
            .with_effects(speak_and_announce(context, 0)),
    }
}

fn speak_and_announce(context: &NodeContext, index: usize) -> [Effect; 2] {
    [
        Effect::speak(context, index),
        Effect::to_peer(context, Payload::Index(index)),
    ]
}
