//! Events that drive a node

use crate::bus::BusEvent;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Connected (or reconnected) to the broker
    Connected,

    /// Time to announce ourselves again while the peer is unconfirmed
    HelloTick,

    /// Raw payload from the bus, not yet decoded
    MessageReceived { topic: String, payload: String },
}

impl From<BusEvent> for Event {
    fn from(event: BusEvent) -> Self {
        match event {
            BusEvent::Connected => Event::Connected,
            BusEvent::MessageReceived { topic, payload } => {
                Event::MessageReceived { topic, payload }
            }
        }
    }
}
