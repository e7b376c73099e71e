//! espeak backend (Linux, Raspberry Pi, macOS with espeak installed)

use super::{run_synthesizer, SpeechError, Speaker};
use async_trait::async_trait;
use tokio::process::Command;

const PROGRAM: &str = "espeak";

#[derive(Debug, Clone)]
pub struct EspeakSpeaker {
    program: String,
    voice: String,
}

impl EspeakSpeaker {
    pub fn new(voice: impl Into<String>) -> Self {
        Self {
            program: PROGRAM.to_string(),
            voice: voice.into(),
        }
    }

    /// Run a different executable with the same arguments
    #[allow(dead_code)] // Used in tests
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Capital-letter emphasis 20, 150 wpm, full amplitude, 5 x 10ms word gap.
    /// The text goes in as a single argument, so no shell quoting is involved.
    fn args(&self, text: &str) -> Vec<String> {
        vec![
            "-v".to_string(),
            self.voice.clone(),
            "-k".to_string(),
            "20".to_string(),
            "-s".to_string(),
            "150".to_string(),
            "-a".to_string(),
            "100".to_string(),
            "-g".to_string(),
            "5".to_string(),
            text.to_string(),
        ]
    }
}

#[async_trait]
impl Speaker for EspeakSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(text));
        run_synthesizer(PROGRAM, cmd).await
    }

    fn name(&self) -> &str {
        PROGRAM
    }
}
