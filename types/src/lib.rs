//! Core domain types for Mediq.
//!
//! This crate contains pure domain types with no IO and no async: the
//! knowledge-base record shapes, the typed display payload, and the
//! transcript turn model. Everything here can be used from any layer.

mod knowledge;
mod payload;
mod sanitize;
mod turn;

pub use knowledge::{ConditionRecord, ExternalLink};
pub use payload::{DisplayBlock, DisplayPayload};
pub use sanitize::sanitize_terminal_text;
pub use turn::{Speaker, Turn};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string guaranteed to be non-empty after trimming.
///
/// Validation occurs at construction time, so all operations on an existing
/// `NonEmptyString` can assume the content is valid. User submissions pass
/// through this type before they are allowed to reach the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("content must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
