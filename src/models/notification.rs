//! Rendered notification records handed to the dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Visual severity class of a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    /// Something was added or joined.
    Success,
    /// Something was removed or left.
    Danger,
    /// Neutral change.
    Info,
}

impl ColorClass {
    /// Embed color as a 24-bit RGB value.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Success => 0x002E_CC71,
            Self::Danger => 0x00E7_4C3C,
            Self::Info => 0x0034_98DB,
        }
    }
}

/// An extra name/value pair rendered below the description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
}

/// A ready-to-send notification, consumed once by the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Short headline.
    pub title: String,
    /// Main body text.
    pub description: String,
    /// Severity class.
    pub color: ColorClass,
    /// User the footer identifies.
    pub footer_subject: UserId,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Ordered extra fields.
    pub fields: Vec<NotificationField>,
}

impl NotificationRecord {
    /// Construct a record stamped with the current time and no fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        color: ColorClass,
        footer_subject: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            footer_subject,
            timestamp: Utc::now(),
            fields: Vec::new(),
        }
    }

    /// Append a field, preserving insertion order.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(NotificationField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Footer text identifying the subject user.
    #[must_use]
    pub fn footer_text(&self) -> String {
        format!("User ID: {}", self.footer_subject)
    }

    /// Look up a field value by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
