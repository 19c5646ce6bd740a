//! Error handling.
//!
//! This module provides:
//! - Error type definitions for initialization and the notify pipeline
//! - Categorization of `reqwest` errors and HTTP statuses
//!
//! Pipeline errors fall into two families:
//! - **Network failures**: any of the three remote calls failed or was rejected
//! - **Formatter failures**: the caller's custom formatter failed

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, categorize_status};
pub use types::{ErrorType, InitializationError, NetworkFailure, NotifyError};
