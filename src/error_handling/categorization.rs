//! Error categorization.
//!
//! This module maps `reqwest` errors and HTTP status codes onto [`ErrorType`]
//! and builds the [`NetworkFailure`] values carried by pipeline errors.

use reqwest::StatusCode;

use super::types::{ErrorType, NetworkFailure};
use crate::utils::sanitize_and_truncate_error_message;

/// Categorizes an HTTP status code into an `ErrorType`.
///
/// Returns `None` for non-error statuses.
pub fn categorize_status(status: StatusCode) -> Option<ErrorType> {
    let error_type = match status.as_u16() {
        // Client errors (4xx)
        400 => ErrorType::HttpRequestBadRequest,
        401 => ErrorType::HttpRequestUnauthorized,
        403 => ErrorType::HttpRequestForbidden,
        404 => ErrorType::HttpRequestNotFound,
        429 => ErrorType::HttpRequestTooManyRequests,
        // Server errors (5xx)
        500 => ErrorType::HttpRequestInternalServerError,
        502 => ErrorType::HttpRequestBadGateway,
        503 => ErrorType::HttpRequestServiceUnavailable,
        504 => ErrorType::HttpRequestGatewayTimeout,
        _ if status.is_client_error() || status.is_server_error() => {
            ErrorType::HttpRequestOtherError
        }
        _ => return None,
    };
    Some(error_type)
}

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// HTTP status codes take precedence over the error kind so that a
/// `error_for_status()` failure is reported by its status.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(error_type) = error.status().and_then(categorize_status) {
        return error_type;
    }

    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_status() {
        ErrorType::HttpRequestStatusError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

// The request URL is dropped: the bot endpoint embeds the token in its path.
impl From<reqwest::Error> for NetworkFailure {
    fn from(error: reqwest::Error) -> Self {
        let error = error.without_url();
        NetworkFailure {
            kind: categorize_reqwest_error(&error),
            message: sanitize_and_truncate_error_message(&error.to_string()),
        }
    }
}

impl NetworkFailure {
    /// Builds a failure for a non-success HTTP status.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let kind = categorize_status(status).unwrap_or(ErrorType::HttpRequestStatusError);
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            format!(
                "HTTP {}: {}",
                status,
                sanitize_and_truncate_error_message(body.trim())
            )
        };
        NetworkFailure { kind, message }
    }

    /// Builds a failure for a response body that could not be parsed.
    pub fn decode(error: impl std::fmt::Display) -> Self {
        NetworkFailure {
            kind: ErrorType::HttpRequestDecodeError,
            message: sanitize_and_truncate_error_message(&error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_status_known_codes() {
        assert_eq!(
            categorize_status(StatusCode::BAD_REQUEST),
            Some(ErrorType::HttpRequestBadRequest)
        );
        assert_eq!(
            categorize_status(StatusCode::FORBIDDEN),
            Some(ErrorType::HttpRequestForbidden)
        );
        assert_eq!(
            categorize_status(StatusCode::TOO_MANY_REQUESTS),
            Some(ErrorType::HttpRequestTooManyRequests)
        );
        assert_eq!(
            categorize_status(StatusCode::GATEWAY_TIMEOUT),
            Some(ErrorType::HttpRequestGatewayTimeout)
        );
    }

    #[test]
    fn test_categorize_status_other_codes() {
        assert_eq!(
            categorize_status(StatusCode::IM_A_TEAPOT),
            Some(ErrorType::HttpRequestOtherError)
        );
        assert_eq!(
            categorize_status(StatusCode::from_u16(521).unwrap()),
            Some(ErrorType::HttpRequestOtherError)
        );
        assert_eq!(categorize_status(StatusCode::OK), None);
        assert_eq!(categorize_status(StatusCode::MOVED_PERMANENTLY), None);
    }

    #[test]
    fn test_failure_from_status_includes_body() {
        let failure = NetworkFailure::from_status(StatusCode::SERVICE_UNAVAILABLE, "down\n");
        assert_eq!(failure.kind, ErrorType::HttpRequestServiceUnavailable);
        assert_eq!(failure.message, "HTTP 503 Service Unavailable: down");

        let failure = NetworkFailure::from_status(StatusCode::NOT_FOUND, "");
        assert_eq!(failure.message, "HTTP 404 Not Found");
    }

    #[test]
    fn test_decode_failure() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let failure = NetworkFailure::decode(err);
        assert_eq!(failure.kind, ErrorType::HttpRequestDecodeError);
        assert!(!failure.message.is_empty());
    }

    #[tokio::test]
    async fn test_categorize_connect_error() {
        // Port 9 on localhost is the discard service; nothing listens there in test environments
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let err = client
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("connection should be refused");
        let kind = categorize_reqwest_error(&err);
        assert!(
            matches!(
                kind,
                ErrorType::HttpRequestConnectError
                    | ErrorType::HttpRequestRequestError
                    | ErrorType::HttpRequestTimeoutError
            ),
            "unexpected category {:?}",
            kind
        );
    }
}
