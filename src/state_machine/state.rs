//! Node state types

use crate::config::{NodeConfig, NodeIdentity, Topic};
use crate::script::Conversation;
use std::sync::Arc;
use std::time::Duration;

/// Whether the peer has been seen. Moves to `Live` once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Announcing ourselves until the peer answers
    #[default]
    AwaitingPeer,

    /// Peer confirmed online; inbound indices drive the conversation
    Live,
}

impl NodeState {
    pub fn peer_online(self) -> bool {
        matches!(self, NodeState::Live)
    }
}

/// Immutable per-node configuration used by transitions
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub identity: NodeIdentity,
    pub own_topic: Topic,
    pub peer_topic: Topic,
    pub conversation: Arc<Conversation>,
    pub restart_delay: Duration,
}

impl NodeContext {
    #[allow(dead_code)] // Used in tests
    pub fn new(
        identity: NodeIdentity,
        namespace: &str,
        conversation: Arc<Conversation>,
        restart_delay: Duration,
    ) -> Self {
        Self {
            own_topic: Topic::for_node(namespace, identity.me()),
            peer_topic: Topic::for_node(namespace, identity.peer()),
            identity,
            conversation,
            restart_delay,
        }
    }

    pub fn from_config(config: &NodeConfig, conversation: Arc<Conversation>) -> Self {
        Self {
            identity: config.identity.clone(),
            own_topic: config.own_topic.clone(),
            peer_topic: config.peer_topic.clone(),
            conversation,
            restart_delay: config.restart_delay,
        }
    }

    /// Whether this node speaks the opening line
    pub fn opens_conversation(&self) -> bool {
        self.conversation.opened_by(self.identity.me())
    }
}
