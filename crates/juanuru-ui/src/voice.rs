use std::sync::Arc;

use juanuru_core::DeviceError;

use crate::devices::{run_command, TextSink};

/// A one-shot speech recognition session.
pub trait SpeechRecognizer: Send + Sync {
    /// Listen once and return the transcript alternatives, best first.
    ///
    /// # Errors
    /// Fails when the session cannot be started or is aborted.
    fn recognize(&self) -> Result<Vec<String>, DeviceError>;
}

/// Recognizer backed by an external command that prints one result per line.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    argv: Vec<String>,
}

impl CommandRecognizer {
    /// Returns `None` for an empty argv.
    pub fn new(argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() {
            return None;
        }
        Some(Self { argv })
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn recognize(&self) -> Result<Vec<String>, DeviceError> {
        let stdout = run_command(&self.argv, None).map_err(DeviceError::Speech)?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Fills a text field from a single voice activation.
pub struct VoiceCapture {
    recognizer: Arc<dyn SpeechRecognizer>,
    field: Arc<dyn TextSink>,
}

impl VoiceCapture {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, field: Arc<dyn TextSink>) -> Self {
        Self { recognizer, field }
    }

    /// Start a session and write the first transcript into the field.
    ///
    /// # Errors
    /// `NoSpeech` when nothing was recognized; recognizer failures pass through.
    pub fn activate(&self) -> Result<String, DeviceError> {
        let results = self.recognizer.recognize()?;
        let transcript = results.into_iter().next().ok_or(DeviceError::NoSpeech)?;

        tracing::debug!("Voice transcript: {}", transcript);
        self.field.set_text(&transcript);
        Ok(transcript)
    }
}
