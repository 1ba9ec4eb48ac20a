use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

use crate::errors::{AppError, AppResult};

pub const SPEECH_UNAVAILABLE: &str = "Speech recognition is not available";
pub const DICTATION_RUNNING: &str = "Dictation is already running.";

/// A device that turns speech into transcript fragments.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechSource: Send + Sync {
    fn start(&self) -> AppResult<()>;
    fn stop(&self);
}

/// Speech recognised by the browser and relayed to us fragment by fragment.
#[derive(Debug, Default)]
pub struct RelayedSpeechSource {
    listening: AtomicBool,
}

impl RelayedSpeechSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

impl SpeechSource for RelayedSpeechSource {
    fn start(&self) -> AppResult<()> {
        self.listening.store(true, Ordering::SeqCst);
        log::debug!("Relayed speech source listening");
        Ok(())
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
        log::debug!("Relayed speech source stopped");
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptFragment {
    pub transcript: String,
    pub is_final: bool,
}

/// Merges a live transcript into the study text.
pub struct Dictation {
    source: Option<Box<dyn SpeechSource>>,
    committed: String,
    interim: String,
    recording: bool,
}

impl Dictation {
    pub fn new(source: Option<Box<dyn SpeechSource>>) -> Self {
        Self {
            source,
            committed: String::new(),
            interim: String::new(),
            recording: false,
        }
    }

    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn is_available(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Starts capture on top of `current_text`, returning the text to display.
    pub fn start(&mut self, current_text: &str) -> AppResult<String> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| AppError::ValidationError(SPEECH_UNAVAILABLE.to_string()))?;
        if self.recording {
            return Err(AppError::Busy(DICTATION_RUNNING.to_string()));
        }

        source.start()?;

        let trimmed = current_text.trim();
        self.committed = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{} ", trimmed)
        };
        self.interim.clear();
        self.recording = true;
        Ok(self.text())
    }

    /// Folds one batch of recognition results in and returns the text to display.
    pub fn on_result(&mut self, fragments: &[TranscriptFragment]) -> String {
        if !self.recording {
            log::debug!("Ignoring {} fragments while not recording", fragments.len());
            return self.text();
        }

        self.interim.clear();
        for fragment in fragments {
            if fragment.is_final {
                self.committed.push_str(fragment.transcript.trim());
                self.committed.push(' ');
            } else {
                self.interim.push_str(&fragment.transcript);
            }
        }
        self.text()
    }

    pub fn stop(&mut self) -> String {
        if self.recording {
            if let Some(source) = &self.source {
                source.stop();
            }
            self.recording = false;
        }
        self.text()
    }

    /// Ends capture after a device failure and returns the message to show.
    pub fn on_error(&mut self, error: &str) -> String {
        log::error!("Speech recognition error: {}", error);
        self.stop();
        format!("Speech recognition error: {}", error)
    }

    pub fn text(&self) -> String {
        format!("{}{}", self.committed, self.interim)
    }
}
