//! Effects produced by state transitions

use super::NodeContext;
use crate::config::Topic;
use crate::wire::Payload;
use std::time::Duration;

/// Effects to be executed, in order, after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Listen on a topic
    Subscribe { topic: Topic },

    /// Send a payload (fire-and-forget)
    Publish { topic: Topic, payload: Payload },

    /// Say a scripted line; blocks until it has been spoken
    Speak { index: usize, text: String },

    /// Natural gap before the script starts over
    Pause { delay: Duration },
}

impl Effect {
    pub fn to_peer(context: &NodeContext, payload: Payload) -> Self {
        Effect::Publish {
            topic: context.peer_topic.clone(),
            payload,
        }
    }

    pub fn speak(context: &NodeContext, index: usize) -> Self {
        Effect::Speak {
            index,
            text: context.conversation.turns()[index].text.clone(),
        }
    }
}
