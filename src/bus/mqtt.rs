//! MQTT transport built on rumqttc

use super::{Bus, BusError, BusEvent, EVENT_QUEUE_DEPTH};
use crate::config::{NodeConfig, Topic};
use async_trait::async_trait;
use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const REQUEST_QUEUE_DEPTH: usize = 64;
/// Breathing room between transport-level reconnect attempts
const RECONNECT_PAUSE: Duration = Duration::from_secs(1);

/// Connected MQTT client. Inbound traffic is pumped into the receiver
/// returned by [`MqttBus::connect`].
pub struct MqttBus {
    client: AsyncClient,
    pump: JoinHandle<()>,
}

impl MqttBus {
    /// Connect to the broker (a single attempt) and start pumping events.
    ///
    /// The first event on the returned receiver is always `Connected`.
    pub async fn connect(
        config: &NodeConfig,
    ) -> Result<(Self, mpsc::Receiver<BusEvent>), BusError> {
        let (client, mut eventloop) = AsyncClient::new(mqtt_options(config), REQUEST_QUEUE_DEPTH);

        tracing::info!(host = %config.host, port = config.port, "Connecting to MQTT");
        wait_for_connack(&mut eventloop)
            .await
            .map_err(|e| BusError::Connection {
                host: config.host.clone(),
                port: config.port,
                reason: e.to_string(),
            })?;
        tracing::info!("Connected to MQTT");

        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        event_tx
            .send(BusEvent::Connected)
            .await
            .map_err(|_| BusError::Closed)?;

        let pump = tokio::spawn(pump_events(eventloop, event_tx));

        Ok((Self { client, pump }, event_rx))
    }
}

impl Drop for MqttBus {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Client options for one process lifetime.
///
/// The session is persistent: the peer only publishes an index once, so the
/// broker must keep our subscription and queue QoS 1 messages while the
/// transport reconnects. rumqttc reuses these options (and the client id) on
/// every reconnect, which is what ties the session together.
fn mqtt_options(config: &NodeConfig) -> MqttOptions {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    let client_id = format!("parley-{}-{suffix}", config.identity.me());

    let mut options = MqttOptions::new(client_id, config.host.clone(), config.port);
    options.set_keep_alive(KEEP_ALIVE);
    options.set_clean_session(false);
    options
}

async fn wait_for_connack(eventloop: &mut EventLoop) -> Result<(), ConnectionError> {
    loop {
        if let Event::Incoming(Packet::ConnAck(_)) = eventloop.poll().await? {
            return Ok(());
        }
    }
}

/// Drive the rumqttc event loop and forward what the runtime cares about.
/// rumqttc reconnects on the next poll after an error; each new `ConnAck`
/// is surfaced as `Connected` so the runtime re-subscribes.
async fn pump_events(mut eventloop: EventLoop, events: mpsc::Sender<BusEvent>) {
    loop {
        let event = match eventloop.poll().await {
            Ok(event) => match to_bus_event(event) {
                Some(event) => event,
                None => continue,
            },
            Err(e) => {
                tracing::warn!(error = %e, "MQTT connection error");
                tokio::time::sleep(RECONNECT_PAUSE).await;
                continue;
            }
        };

        if event == BusEvent::Connected {
            tracing::info!("Reconnected to MQTT");
        }

        if events.send(event).await.is_err() {
            tracing::debug!("Event receiver dropped, stopping MQTT pump");
            break;
        }
    }
}

/// The inbound traffic the runtime cares about; everything else is protocol
/// housekeeping
fn to_bus_event(event: Event) -> Option<BusEvent> {
    match event {
        Event::Incoming(Packet::ConnAck(_)) => Some(BusEvent::Connected),
        Event::Incoming(Packet::Publish(publish)) => Some(BusEvent::MessageReceived {
            topic: publish.topic,
            payload: String::from_utf8_lossy(&publish.payload).into_owned(),
        }),
        _ => None,
    }
}

#[async_trait]
impl Bus for MqttBus {
    async fn subscribe(&self, topic: &Topic) -> Result<(), BusError> {
        self.client
            .subscribe(topic.as_str(), QoS::AtLeastOnce)
            .await
            .map_err(|e| BusError::Subscribe {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }

    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), BusError> {
        self.client
            .publish(topic.as_str(), QoS::AtLeastOnce, false, payload.to_string())
            .await
            .map_err(|e| BusError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}
