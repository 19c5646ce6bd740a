//! Configuration types and CLI options.
//!
//! This module defines the notifier configuration, its validation, and the
//! command-line options used by the binary host.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_BOT_API_BASE, DEFAULT_DEBOUNCE, DEFAULT_FIELDS, DEFAULT_GEO_ENDPOINT,
    DEFAULT_IP_ENDPOINT, DEFAULT_REQUEST_TIMEOUT,
};
use crate::message::{parse_fields, Field, ParseMode};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Reasons a [`NotifierConfig`] is rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The bot token is empty.
    #[error("bot token must not be empty")]
    MissingBotToken,

    /// The chat id is empty.
    #[error("chat id must not be empty")]
    MissingChatId,

    /// An endpoint is not an absolute http(s) URL.
    #[error("invalid {name} endpoint '{value}': {reason}")]
    InvalidEndpoint {
        /// Which endpoint (ip, geo, bot)
        name: &'static str,
        /// The rejected value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The request timeout is zero.
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Notifier configuration (no CLI dependencies).
///
/// Callbacks and the custom formatter are not part of the configuration; they
/// are attached to the [`Notifier`](crate::Notifier) with builder methods.
///
/// # Examples
///
/// ```no_run
/// use notigram::NotifierConfig;
/// use std::time::Duration;
///
/// let config = NotifierConfig {
///     debounce: Duration::from_millis(500),
///     ..NotifierConfig::new("123456:token", "-100200300")
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Bot API credential
    pub bot_token: String,

    /// Delivery target (chat, group or channel id)
    pub chat_id: String,

    /// Ordered field selection for the built-in formatter
    pub fields: Vec<Field>,

    /// Markup mode sent with the message
    pub parse_mode: ParseMode,

    /// Suppresses the whole pipeline when true
    pub disabled: bool,

    /// Delay between mount and the scheduled fire
    pub debounce: Duration,

    /// Timeout applied to each remote call
    pub request_timeout: Duration,

    /// Send a context-only message when the IP/geolocation lookups fail
    pub degrade_on_lookup_failure: bool,

    /// Public IP resolution endpoint
    pub ip_endpoint: String,

    /// Geolocation endpoint (IP is appended as a path segment)
    pub geo_endpoint: String,

    /// Bot API base URL
    pub bot_api_base: String,
}

impl NotifierConfig {
    /// Creates a configuration with the given credentials and defaults for everything else.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            ..Default::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the credentials are empty, the timeout is
    /// zero, or an endpoint is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::MissingBotToken);
        }
        if self.chat_id.trim().is_empty() {
            return Err(ConfigError::MissingChatId);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        validate_endpoint("ip", &self.ip_endpoint)?;
        validate_endpoint("geo", &self.geo_endpoint)?;
        validate_endpoint("bot", &self.bot_api_base)?;
        Ok(())
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            fields: DEFAULT_FIELDS.to_vec(),
            parse_mode: ParseMode::Html,
            disabled: false,
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            degrade_on_lookup_failure: false,
            ip_endpoint: DEFAULT_IP_ENDPOINT.to_string(),
            geo_endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
            bot_api_base: DEFAULT_BOT_API_BASE.to_string(),
        }
    }
}

fn validate_endpoint(name: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        name,
        value: value.to_string(),
        reason,
    };
    let parsed = url::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

/// Command-line options for the `notigram` binary.
///
/// Every option can also be supplied through the environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "notigram", version, about = "Send a one-shot visitor alert to a Telegram chat")]
pub struct Opt {
    /// Telegram bot token
    #[arg(long, env = "NOTIGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Target chat id
    #[arg(long, env = "NOTIGRAM_CHAT_ID")]
    pub chat_id: String,

    /// Path of the visited page
    #[arg(long, default_value = "/")]
    pub page: String,

    /// Full URL of the visited page
    #[arg(long)]
    pub url: Option<String>,

    /// Referrer of the visit
    #[arg(long)]
    pub referrer: Option<String>,

    /// Raw User-Agent of the visitor
    #[arg(long, env = "NOTIGRAM_USER_AGENT", default_value = "")]
    pub user_agent: String,

    /// Comma-separated field selection (e.g. "ip,country,flag,device")
    #[arg(long, env = "NOTIGRAM_FIELDS")]
    pub fields: Option<String>,

    /// Delay before firing, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub debounce_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_seconds: u64,

    /// Send a partial message when the geolocation lookup fails
    #[arg(long)]
    pub degrade: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

impl Opt {
    /// Builds the notifier configuration from the parsed options.
    pub fn to_config(&self) -> NotifierConfig {
        let fields = match &self.fields {
            Some(raw) => parse_fields(raw.split(',')),
            None => DEFAULT_FIELDS.to_vec(),
        };
        NotifierConfig {
            fields,
            debounce: Duration::from_millis(self.debounce_ms),
            request_timeout: Duration::from_secs(self.timeout_seconds),
            degrade_on_lookup_failure: self.degrade,
            ..NotifierConfig::new(self.bot_token.clone(), self.chat_id.clone())
        }
    }
}
