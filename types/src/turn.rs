//! Transcript turn model.
//!
//! Constructors take `SystemTime` explicitly; callers own the clock.

use std::time::SystemTime;

use crate::DisplayPayload;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One message in the conversation transcript.
///
/// Turns are appended to an ordered, append-only transcript and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    speaker: Speaker,
    payload: DisplayPayload,
    timestamp: SystemTime,
}

impl Turn {
    #[must_use]
    pub fn new(speaker: Speaker, payload: DisplayPayload, timestamp: SystemTime) -> Self {
        Self {
            speaker,
            payload,
            timestamp,
        }
    }

    #[must_use]
    pub fn user(payload: DisplayPayload, timestamp: SystemTime) -> Self {
        Self::new(Speaker::User, payload, timestamp)
    }

    #[must_use]
    pub fn assistant(payload: DisplayPayload, timestamp: SystemTime) -> Self {
        Self::new(Speaker::Assistant, payload, timestamp)
    }

    #[must_use]
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    #[must_use]
    pub fn payload(&self) -> &DisplayPayload {
        &self.payload
    }

    #[must_use]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}
