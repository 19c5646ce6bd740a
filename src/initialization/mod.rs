//! Resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - The HTTP client used for every remote call
//! - The logger
//! - The default collaborators of a [`Notifier`](crate::Notifier)

mod client;
mod logger;

use std::sync::Arc;

use crate::config::NotifierConfig;
use crate::context::{AgentParser, RegexAgentParser};
use crate::delivery::{MessageSender, TelegramSender};
use crate::error_handling::InitializationError;
use crate::identity::{HttpIdentityResolver, IdentityResolver};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// The collaborators a notifier talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Public IP and geolocation lookup
    pub identity: Arc<dyn IdentityResolver>,
    /// User-Agent classification
    pub agent_parser: Arc<dyn AgentParser>,
    /// Message delivery
    pub sender: Arc<dyn MessageSender>,
}

/// Builds the HTTP-backed collaborators for `config`.
///
/// Validates the configuration and creates one shared HTTP client with the
/// configured request timeout.
///
/// # Errors
///
/// Returns an [`InitializationError`] if the configuration is invalid or the
/// HTTP client cannot be built.
pub fn init_collaborators(config: &NotifierConfig) -> Result<Collaborators, InitializationError> {
    config.validate()?;
    let client = init_client(config.request_timeout)?;

    Ok(Collaborators {
        identity: Arc::new(HttpIdentityResolver::from_config(Arc::clone(&client), config)),
        agent_parser: Arc::new(RegexAgentParser),
        sender: Arc::new(TelegramSender::from_config(client, config)),
    })
}
