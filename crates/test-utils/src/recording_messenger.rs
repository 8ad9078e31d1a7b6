use std::sync::{Arc, Mutex};

use gir::{LogLevel, Messenger};

/// A fake messenger that records every message it receives, unfiltered.
#[derive(Debug, Clone, Default)]
pub struct RecordingMessenger {
    messages: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything logged so far, in order.
    pub fn messages(&self) -> Vec<(LogLevel, String)> {
        self.messages.lock().unwrap().clone()
    }

    /// Messages logged at exactly `level`.
    pub fn at(&self, level: LogLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Messenger for RecordingMessenger {
    fn log(&self, level: LogLevel, message: &str) {
        self.messages.lock().unwrap().push((level, message.to_string()));
    }
}
