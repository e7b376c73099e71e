//! Node runtime executor

use super::NodeError;
use crate::bus::{Bus, BusError, BusEvent};
use crate::speech::Speaker;
use crate::state_machine::{transition, Effect, Event, NodeContext, NodeState};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Generic node runtime that can work with any bus and speaker implementation
pub struct NodeRuntime<B, S>
where
    B: Bus,
    S: Speaker,
{
    context: NodeContext,
    state: NodeState,
    bus: B,
    speaker: S,
    events: mpsc::Receiver<BusEvent>,
    hello_interval: Duration,
}

impl<B, S> NodeRuntime<B, S>
where
    B: Bus,
    S: Speaker,
{
    pub fn new(
        context: NodeContext,
        bus: B,
        speaker: S,
        events: mpsc::Receiver<BusEvent>,
        hello_interval: Duration,
    ) -> Self {
        Self {
            context,
            state: NodeState::AwaitingPeer,
            bus,
            speaker,
            events,
            hello_interval,
        }
    }

    /// Run until the bus goes away or speech fails. Never returns `Ok` on its
    /// own; callers end a healthy node by dropping this future.
    pub async fn run(mut self) -> Result<(), NodeError> {
        tracing::info!(
            me = %self.context.identity.me(),
            peer = %self.context.identity.peer(),
            "Waiting for {} to come online",
            self.context.identity.peer()
        );

        let mut hello = tokio::time::interval(self.hello_interval);
        hello.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempt: u64 = 0;

        // Process events in a loop, strictly one at a time
        loop {
            let event = tokio::select! {
                // Queued bus traffic first: the initial `Connected` must be
                // handled (subscribe) before the first hello goes out.
                biased;

                received = self.events.recv() => match received {
                    Some(event) => Event::from(event),
                    None => return Err(BusError::Closed.into()),
                },

                _ = hello.tick(), if !self.state.peer_online() => {
                    attempt += 1;
                    tracing::info!(attempt, "Announcing presence");
                    Event::HelloTick
                }
            };

            self.process_event(event).await?;
        }
    }

    async fn process_event(&mut self, event: Event) -> Result<(), NodeError> {
        let result = match transition(self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                // Noise on the wire is expected and never fatal
                tracing::debug!(error = %e, "Ignoring message");
                return Ok(());
            }
        };

        let was_online = self.state.peer_online();
        self.state = result.new_state;
        if !was_online && self.state.peer_online() {
            tracing::info!(peer = %self.context.identity.peer(), "Partner is online! Let's go!");
        }

        for effect in result.effects {
            self.execute_effect(effect).await?;
        }

        Ok(())
    }

    async fn execute_effect(&self, effect: Effect) -> Result<(), NodeError> {
        match effect {
            Effect::Subscribe { topic } => {
                tracing::info!(%topic, "Subscribing");
                self.bus.subscribe(&topic).await?;
            }

            Effect::Publish { topic, payload } => {
                tracing::debug!(%topic, %payload, "Publishing");
                self.bus.publish(&topic, &payload.encode()).await?;
            }

            Effect::Speak { index, text } => {
                tracing::debug!(index, "Taking turn");
                self.speaker.speak(&text).await?;
            }

            Effect::Pause { delay } => {
                tracing::info!(
                    delay_ms = %delay.as_millis(),
                    "End of the script, starting over"
                );
                tokio::time::sleep(delay).await;
            }
        }

        Ok(())
    }
}
