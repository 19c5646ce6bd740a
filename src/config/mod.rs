//! Notifier configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, timeouts, message banners)
//! - The [`NotifierConfig`] struct and its validation
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{ConfigError, LogFormat, LogLevel, NotifierConfig, Opt};
