//! Error type definitions.
//!
//! This module defines the errors raised while initializing the notifier and
//! while running the collect-and-notify pipeline.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configuration was rejected.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

/// Categories of transport-level failures on a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// The request could not be built
    HttpRequestBuilderError,
    /// Redirect policy violation
    HttpRequestRedirectError,
    /// Unmapped non-success status
    HttpRequestStatusError,
    /// The request timed out
    HttpRequestTimeoutError,
    /// Failure while sending the request
    HttpRequestRequestError,
    /// Connection could not be established
    HttpRequestConnectError,
    /// Request or response body error
    HttpRequestBodyError,
    /// Response body could not be decoded
    HttpRequestDecodeError,
    /// Anything else
    HttpRequestOtherError,
    /// 429 Too Many Requests
    HttpRequestTooManyRequests,
    /// 400 Bad Request
    HttpRequestBadRequest,
    /// 401 Unauthorized
    HttpRequestUnauthorized,
    /// 403 Forbidden
    HttpRequestForbidden,
    /// 404 Not Found
    HttpRequestNotFound,
    /// 500 Internal Server Error
    HttpRequestInternalServerError,
    /// 502 Bad Gateway
    HttpRequestBadGateway,
    /// 503 Service Unavailable
    HttpRequestServiceUnavailable,
    /// 504 Gateway Timeout
    HttpRequestGatewayTimeout,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Human-readable category name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestStatusError => "HTTP request status error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestTooManyRequests => "Too many requests (429)",
            ErrorType::HttpRequestBadRequest => "Bad Request (400)",
            ErrorType::HttpRequestUnauthorized => "Unauthorized (401)",
            ErrorType::HttpRequestForbidden => "Forbidden (403)",
            ErrorType::HttpRequestNotFound => "Not Found (404)",
            ErrorType::HttpRequestInternalServerError => "Internal Server Error (500)",
            ErrorType::HttpRequestBadGateway => "Bad Gateway (502)",
            ErrorType::HttpRequestServiceUnavailable => "Service Unavailable (503)",
            ErrorType::HttpRequestGatewayTimeout => "Gateway Timeout (504)",
        }
    }

    /// True for failures caused by the per-request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ErrorType::HttpRequestTimeoutError | ErrorType::HttpRequestGatewayTimeout
        )
    }
}

/// A transport failure on one of the three remote calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct NetworkFailure {
    /// Categorized failure
    pub kind: ErrorType,
    /// Underlying error text
    pub message: String,
}

/// Errors produced by the collect-and-notify pipeline.
///
/// Every variant is caught at the dispatch boundary and reported through the
/// error callback; none of them propagate into the host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    /// Resolving the public IP failed.
    #[error("IP lookup failed: {0}")]
    IpLookup(NetworkFailure),

    /// Fetching the geolocation profile failed.
    #[error("Geolocation lookup failed: {0}")]
    GeoLookup(NetworkFailure),

    /// The geolocation service answered but reported a failure.
    #[error("Geolocation lookup rejected for {ip}: {message}")]
    GeoRejected {
        /// IP that was looked up
        ip: String,
        /// Message returned by the service
        message: String,
    },

    /// Posting the message to the bot endpoint failed.
    #[error("Message delivery failed: {0}")]
    Delivery(NetworkFailure),

    /// The bot API refused the message.
    #[error("Message delivery rejected (status {status}): {description}")]
    DeliveryRejected {
        /// HTTP status returned by the bot API
        status: u16,
        /// Description returned by the bot API
        description: String,
    },

    /// The custom formatter returned an error or panicked.
    #[error("Custom message formatter failed: {0}")]
    Formatter(String),

    /// A collaborator (resolver, agent parser or sender) panicked mid-run.
    #[error("Visitor pipeline failed: {0}")]
    Panicked(String),
}

impl NotifyError {
    /// True for failures of a remote call (lookup or delivery).
    pub fn is_network(&self) -> bool {
        !matches!(self, NotifyError::Formatter(_) | NotifyError::Panicked(_))
    }

    /// True for failures of the IP or geolocation lookups.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            NotifyError::IpLookup(_) | NotifyError::GeoLookup(_) | NotifyError::GeoRejected { .. }
        )
    }
}
