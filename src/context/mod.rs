//! Local visit context.
//!
//! Captures everything about the visit that is available without a network
//! call: the page, the referrer, the time of the visit and the visitor's
//! device/browser/OS as derived from the User-Agent.

mod agent;

use chrono::{DateTime, Local};

use crate::config::{DIRECT_REFERRER, TIMESTAMP_FORMAT};

pub use agent::{AgentInfo, AgentParser, DeviceInfo, NamedVersion, RegexAgentParser};

/// Page and navigator state supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Path of the visited page, e.g. "/pricing"
    pub path: String,
    /// Full URL of the visited page
    pub full_url: String,
    /// Referring URL, if any
    pub referrer: Option<String>,
    /// Raw User-Agent string of the visitor
    pub user_agent: String,
}

impl PageContext {
    /// Builds a context from a full URL, deriving the path from it.
    ///
    /// An unparseable URL is kept verbatim as both URL and path.
    pub fn from_url(
        full_url: impl Into<String>,
        referrer: Option<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        let full_url = full_url.into();
        let path = url::Url::parse(&full_url)
            .map(|parsed| parsed.path().to_string())
            .unwrap_or_else(|_| full_url.clone());
        Self {
            path,
            full_url,
            referrer,
            user_agent: user_agent.into(),
        }
    }
}

/// Local context gathered at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnapshot {
    /// Device label (see [`DeviceInfo::label`])
    pub device: String,
    /// "name version" of the browser
    pub browser: Option<String>,
    /// "name version" of the operating system
    pub os: Option<String>,
    /// Path of the visited page
    pub page: String,
    /// Full URL of the visited page
    pub full_url: String,
    /// Referrer, or "Direct" when the visit had none
    pub referrer: String,
    /// Local time of the visit
    pub timestamp: String,
    /// Raw User-Agent string
    pub user_agent: String,
}

/// Captures the local context at the current time.
///
/// Never fails: missing pieces are filled with their defaults.
pub fn snapshot(page: &PageContext, parser: &dyn AgentParser) -> ContextSnapshot {
    snapshot_at(page, parser, Local::now())
}

/// Captures the local context at a fixed time.
pub fn snapshot_at(
    page: &PageContext,
    parser: &dyn AgentParser,
    now: DateTime<Local>,
) -> ContextSnapshot {
    let agent = parser.parse(&page.user_agent);
    let referrer = page
        .referrer
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DIRECT_REFERRER)
        .to_string();

    ContextSnapshot {
        device: agent.device.label(),
        browser: agent.browser.label(),
        os: agent.os.label(),
        page: page.path.clone(),
        full_url: page.full_url.clone(),
        referrer,
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        user_agent: page.user_agent.clone(),
    }
}
