//! Runtime for a conversation node
//!
//! Owns the node state and feeds bus events through the pure transition
//! function one at a time, executing the resulting effects before the next
//! event is looked at.

mod executor;


pub use executor::NodeRuntime;

use crate::bus::{BusError, MqttBus};
use crate::speech::{LoggingSpeaker, SpeechBackend, SpeechError};
use thiserror::Error;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = NodeRuntime<MqttBus, LoggingSpeaker<SpeechBackend>>;

/// Conditions that end a node
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error(transparent)]
    Speech(#[from] SpeechError),
}
