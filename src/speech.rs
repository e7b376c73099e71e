//! Speech output
//!
//! A single `Speaker` capability. The platform backend is chosen once at
//! startup; callers never branch on the OS again.

mod espeak;
mod sapi;

pub use espeak::EspeakSpeaker;
pub use sapi::SapiSpeaker;

use crate::config::NodeConfig;
use async_trait::async_trait;
use clap::ValueEnum;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The speech program could not be started at all
    #[error("{backend} is not available: {source}")]
    Unavailable {
        backend: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{backend} failed with {status}")]
    Failed {
        backend: &'static str,
        status: ExitStatus,
    },
}

/// Something that can say a line out loud
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text`, returning once the utterance has finished
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;

    fn name(&self) -> &str;
}

#[async_trait]
impl<T: Speaker + ?Sized> Speaker for Arc<T> {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        (**self).speak(text).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpeechBackendKind {
    /// Windows `System.Speech` (SAPI)
    Sapi,
    /// `espeak` command line synthesizer
    Espeak,
}

impl SpeechBackendKind {
    pub fn for_platform() -> Self {
        if cfg!(windows) {
            Self::Sapi
        } else {
            Self::Espeak
        }
    }
}

/// Platform speech backend
#[derive(Debug, Clone)]
pub enum SpeechBackend {
    Sapi(SapiSpeaker),
    Espeak(EspeakSpeaker),
}

impl SpeechBackend {
    pub fn new(kind: SpeechBackendKind, voice: &str) -> Self {
        match kind {
            SpeechBackendKind::Sapi => Self::Sapi(SapiSpeaker::new()),
            SpeechBackendKind::Espeak => Self::Espeak(EspeakSpeaker::new(voice)),
        }
    }

    /// Honour an explicit backend from the config, else go by platform
    pub fn detect(config: &NodeConfig) -> Self {
        let kind = config
            .speech_backend
            .unwrap_or_else(SpeechBackendKind::for_platform);
        Self::new(kind, &config.voice)
    }
}

#[async_trait]
impl Speaker for SpeechBackend {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        match self {
            Self::Sapi(speaker) => speaker.speak(text).await,
            Self::Espeak(speaker) => speaker.speak(text).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Sapi(speaker) => speaker.name(),
            Self::Espeak(speaker) => speaker.name(),
        }
    }
}

/// Logging wrapper for speakers
pub struct LoggingSpeaker<S> {
    inner: S,
}

impl<S: Speaker> LoggingSpeaker<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: Speaker> Speaker for LoggingSpeaker<S> {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        tracing::info!(backend = %self.inner.name(), "Saying: {text}");

        let start = std::time::Instant::now();
        let result = self.inner.speak(text).await;
        let duration = start.elapsed();

        match &result {
            Ok(()) => {
                tracing::debug!(
                    backend = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    "Utterance finished"
                );
            }
            Err(e) => {
                tracing::error!(
                    backend = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "Utterance failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Run a synthesizer process to completion, discarding its output
async fn run_synthesizer(backend: &'static str, mut cmd: Command) -> Result<(), SpeechError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let status = cmd
        .status()
        .await
        .map_err(|source| SpeechError::Unavailable { backend, source })?;

    if status.success() {
        Ok(())
    } else {
        Err(SpeechError::Failed { backend, status })
    }
}
