//! Configuration constants.
//!
//! This module defines the endpoints, timeouts and message decorations used
//! throughout the notifier.

use std::time::Duration;

use crate::message::Field;

// Remote endpoints (used as defaults)
/// Public IP resolution endpoint. Responds with `{"ip": "..."}`.
pub const DEFAULT_IP_ENDPOINT: &str = "https://api.ipify.org?format=json";
/// Geolocation-by-IP endpoint. The IP is appended as a path segment.
pub const DEFAULT_GEO_ENDPOINT: &str = "https://ipwho.is";
/// Telegram Bot API base URL. `/bot<token>/sendMessage` is appended.
pub const DEFAULT_BOT_API_BASE: &str = "https://api.telegram.org";

// Network operation timeouts
/// Per-request timeout applied to every remote call.
/// A hung lookup or delivery fails with a timeout instead of stalling the dispatch forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay before the scheduled fire runs after mount.
pub const DEFAULT_DEBOUNCE: Duration = Duration::ZERO;

/// Referrer recorded when the visit has none.
pub const DIRECT_REFERRER: &str = "Direct";

/// Device label used when the user-agent carries no vendor/model or device type.
pub const DEFAULT_DEVICE_LABEL: &str = "Desktop";

/// Local timestamp format for the visit time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

// Message decorations
/// Banner placed above the field lines.
pub const MESSAGE_HEADER: &str = "🚨 <b>New Visitor Alert</b>\n━━━━━━━━━━━━━━━\n";
/// Banner placed below the field lines.
pub const MESSAGE_FOOTER: &str = "━━━━━━━━━━━━━━━\n<i>Built with 💙 by Dycoder</i>";

/// Field selection used when the caller supplies none.
pub const DEFAULT_FIELDS: &[Field] = &[
    Field::Page,
    Field::Country,
    Field::Flag,
    Field::City,
    Field::Device,
    Field::Time,
];

// Error message size limits
/// Maximum error message length in characters.
/// Remote error bodies longer than this are truncated before logging.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 500;
