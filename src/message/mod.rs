//! Message formatting.
//!
//! This module provides:
//! - The [`Field`] keys understood by the built-in formatter
//! - The built-in HTML formatter ([`format_message`])
//! - [`MessageTemplate`], which picks between the built-in formatter and a
//!   caller-supplied [`CustomFormatter`]
//!
//! The built-in formatter escapes remote text for HTML, so its output must be
//! sent with [`ParseMode::Html`]; [`MessageTemplate::parse_mode`] enforces
//! that pairing.

mod escape;
mod fields;
mod format;

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;

use crate::error_handling::NotifyError;
use crate::record::VisitorRecord;

pub use escape::escape_html;
pub use fields::{parse_fields, Field};
pub use format::{format_message, render_field};

/// Markup mode the bot API uses to interpret the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ParseMode {
    /// HTML tags; the built-in formatter escapes for this mode
    #[default]
    #[serde(rename = "HTML")]
    Html,
    /// Telegram's MarkdownV2 dialect
    #[serde(rename = "MarkdownV2")]
    MarkdownV2,
    /// Legacy Markdown
    #[serde(rename = "Markdown")]
    Markdown,
}

impl ParseMode {
    /// Value sent in the `parse_mode` request field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::MarkdownV2 => "MarkdownV2",
            ParseMode::Markdown => "Markdown",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied formatter that replaces the built-in one entirely.
pub type CustomFormatter = Arc<dyn Fn(&VisitorRecord) -> anyhow::Result<String> + Send + Sync>;

/// How the message text is produced.
#[derive(Clone)]
pub enum MessageTemplate {
    /// Built-in formatter with an ordered field selection
    Fields(Vec<Field>),
    /// Caller-supplied formatter; no field selection applies
    Custom(CustomFormatter),
}

impl MessageTemplate {
    /// Produces the message text for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Formatter`] if a custom formatter returns an
    /// error or panics. The built-in formatter cannot fail.
    pub fn render(&self, record: &VisitorRecord) -> Result<String, NotifyError> {
        match self {
            MessageTemplate::Fields(fields) => Ok(format_message(record, fields)),
            MessageTemplate::Custom(formatter) => {
                match catch_unwind(AssertUnwindSafe(|| formatter(record))) {
                    Ok(Ok(text)) => Ok(text),
                    Ok(Err(e)) => Err(NotifyError::Formatter(format!("{:#}", e))),
                    Err(panic) => Err(NotifyError::Formatter(panic_message(panic.as_ref()))),
                }
            }
        }
    }

    /// Parse mode to send with the rendered text.
    ///
    /// The built-in formatter always produces HTML; custom formatters use the
    /// configured mode.
    pub fn parse_mode(&self, configured: ParseMode) -> ParseMode {
        match self {
            MessageTemplate::Fields(_) => ParseMode::Html,
            MessageTemplate::Custom(_) => configured,
        }
    }
}

impl fmt::Debug for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageTemplate::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            MessageTemplate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}
