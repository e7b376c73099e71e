//! Node configuration
//!
//! Parsed once at startup from the command line (with `PARLEY_*` environment
//! fallbacks) and handed to the runtime as an immutable value.

use crate::speech::SpeechBackendKind;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_NAMESPACE: &str = "mcartface/nodes";
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Speak one half of a scripted conversation, taking turns with a peer over MQTT
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of this node (e.g. "izzy")
    pub me: String,

    /// Name of the other node (e.g. "dave")
    pub peer: String,

    /// MQTT broker host
    #[arg(default_value = "localhost", env = "PARLEY_MQTT_HOST")]
    pub host: String,

    /// MQTT broker port
    #[arg(long, default_value_t = DEFAULT_MQTT_PORT, env = "PARLEY_MQTT_PORT")]
    pub port: u16,

    /// Topic prefix; each node listens on `<namespace>/<name>`
    #[arg(long, default_value = DEFAULT_NAMESPACE, env = "PARLEY_NAMESPACE")]
    pub namespace: String,

    /// Conversation script (JSON array of `{speaker, text}`)
    #[arg(long, default_value = "./conversation.json", env = "PARLEY_SCRIPT")]
    pub script: PathBuf,

    /// How often to announce ourselves while waiting for the peer
    #[arg(long, default_value_t = 2000, env = "PARLEY_HELLO_INTERVAL_MS")]
    pub hello_interval_ms: u64,

    /// Pause before the script starts over from the top
    #[arg(long, default_value_t = 5000, env = "PARLEY_RESTART_DELAY_MS")]
    pub restart_delay_ms: u64,

    /// Voice passed to espeak
    #[arg(long, default_value = "en-us+f3", env = "PARLEY_VOICE")]
    pub voice: String,

    /// Force a speech backend instead of detecting it from the platform
    #[arg(long, value_enum, env = "PARLEY_SPEECH_BACKEND")]
    pub speech_backend: Option<SpeechBackendKind>,

    /// Emit logs as JSON lines
    #[arg(long, env = "PARLEY_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} node name must not be empty")]
    EmptyIdentity(&'static str),
    #[error("node and peer must have different names (both are {0:?})")]
    SameIdentity(String),
    #[error("hello interval must be greater than zero")]
    ZeroHelloInterval,
}

/// Lowercase names of this node and its counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    me: String,
    peer: String,
}

impl NodeIdentity {
    pub fn new(me: &str, peer: &str) -> Result<Self, ConfigError> {
        let me = normalize_name(me);
        let peer = normalize_name(peer);

        if me.is_empty() {
            return Err(ConfigError::EmptyIdentity("this"));
        }
        if peer.is_empty() {
            return Err(ConfigError::EmptyIdentity("peer"));
        }
        if me == peer {
            return Err(ConfigError::SameIdentity(me));
        }

        Ok(Self { me, peer })
    }

    pub fn me(&self) -> &str {
        &self.me
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

/// Names are compared case-insensitively everywhere, so fold once here.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A pub/sub address, `<namespace>/<identity>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    pub fn for_node(namespace: &str, identity: &str) -> Self {
        Self(format!("{}/{identity}", namespace.trim_end_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a node needs, fixed for the lifetime of the process
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub identity: NodeIdentity,
    /// Where we listen
    pub own_topic: Topic,
    /// Where the peer listens
    pub peer_topic: Topic,
    pub host: String,
    pub port: u16,
    pub script_path: PathBuf,
    pub hello_interval: Duration,
    pub restart_delay: Duration,
    pub voice: String,
    pub speech_backend: Option<SpeechBackendKind>,
    pub log_json: bool,
}

impl TryFrom<Cli> for NodeConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let identity = NodeIdentity::new(&cli.me, &cli.peer)?;

        if cli.hello_interval_ms == 0 {
            return Err(ConfigError::ZeroHelloInterval);
        }

        Ok(Self {
            own_topic: Topic::for_node(&cli.namespace, identity.me()),
            peer_topic: Topic::for_node(&cli.namespace, identity.peer()),
            identity,
            host: cli.host,
            port: cli.port,
            script_path: cli.script,
            hello_interval: Duration::from_millis(cli.hello_interval_ms),
            restart_delay: Duration::from_millis(cli.restart_delay_ms),
            voice: cli.voice,
            speech_backend: cli.speech_backend,
            log_json: cli.log_json,
        })
    }
}
