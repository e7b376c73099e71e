//! Windows SAPI backend, driven through PowerShell's `System.Speech`

use super::{run_synthesizer, SpeechError, Speaker};
use async_trait::async_trait;
use tokio::process::Command;

const BACKEND: &str = "sapi";
const PROGRAM: &str = "powershell";

#[derive(Debug, Clone)]
pub struct SapiSpeaker {
    program: String,
}

impl SapiSpeaker {
    pub fn new() -> Self {
        Self {
            program: PROGRAM.to_string(),
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for SapiSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

/// Characters PowerShell accepts as a single-quote delimiter: ASCII `'` and
/// the typographic quotes U+2018 to U+201B
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// PowerShell snippet that speaks `text` synchronously.
/// Inside a single-quoted literal a quote is escaped by doubling it.
fn script(text: &str) -> String {
    let mut literal = String::with_capacity(text.len());
    for c in text.chars() {
        if SINGLE_QUOTES.contains(&c) {
            literal.push(c);
        }
        literal.push(c);
    }
    format!(
        "Add-Type -AssemblyName System.Speech; \
         $voice = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
         $voice.Speak('{literal}')"
    )
}

#[async_trait]
impl Speaker for SapiSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let command = script(text);
        let mut cmd = Command::new(&self.program);
        cmd.args(["-NoProfile", "-NonInteractive", "-Command", command.as_str()]);
        run_synthesizer(BACKEND, cmd).await
    }

    fn name(&self) -> &str {
        BACKEND
    }
}
