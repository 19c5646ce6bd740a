//! notigram library: one-shot visitor alerts delivered to a Telegram chat
//!
//! When a page is visited, a [`Notifier`] looks up the public IP and
//! geolocation of the running host, classifies the visitor's User-Agent,
//! merges both into a [`VisitorRecord`], renders it as a message and posts it
//! to a chat through the Telegram Bot API. Each notifier fires at most once.
//!
//! # Example
//!
//! ```no_run
//! use notigram::{Field, Notifier, NotifierConfig, PageContext};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NotifierConfig {
//!     fields: vec![Field::Ip, Field::Country, Field::Flag, Field::Device],
//!     debounce: Duration::from_millis(500),
//!     ..NotifierConfig::new("123456:token", "-100200300")
//! };
//! let page = PageContext::from_url("https://example.com/", None, "Mozilla/5.0 ...");
//!
//! let notifier = Notifier::builder(config, page).build()?;
//! notifier.mount();
//! notifier.wait().await;
//! println!("final state: {:?}", notifier.state());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Scheduling requires a Tokio runtime. Call [`Notifier::mount`] from within
//! an async context.

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod delivery;
mod dispatch;
pub mod error_handling;
mod http;
pub mod identity;
pub mod initialization;
pub mod message;
mod record;
mod utils;

// Re-export public API
pub use config::{ConfigError, LogFormat, LogLevel, NotifierConfig, Opt};
pub use context::{ContextSnapshot, PageContext};
pub use dispatch::{
    DispatchOutcome, DispatchState, ErrorCallback, Notifier, NotifierBuilder, SuccessCallback,
};
pub use error_handling::{InitializationError, NotifyError};
pub use message::{Field, MessageTemplate, ParseMode};
pub use record::{merge, VisitorRecord};
