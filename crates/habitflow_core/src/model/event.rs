//! Notification payloads emitted by engine operations.

use serde::Serialize;

/// Positive-event notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Celebration {
    pub icon: String,
    pub title: String,
    pub message: String,
}

impl Celebration {
    pub fn new(
        icon: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            message: message.into(),
        }
    }
}
