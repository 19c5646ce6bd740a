//! Shared JSON request helpers for the remote services.
//!
//! Each helper performs exactly one request (no retries) and turns transport
//! errors, non-success statuses and unparseable bodies into a [`NetworkFailure`].

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error_handling::NetworkFailure;

/// A decoded response body together with its HTTP status.
#[derive(Debug)]
pub(crate) struct JsonResponse<T> {
    pub status: reqwest::StatusCode,
    pub body: T,
}

/// Sends a GET request and decodes a successful JSON response.
///
/// # Errors
///
/// Returns a [`NetworkFailure`] on transport errors, on non-2xx statuses, or if
/// the body is not valid JSON for `T`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, NetworkFailure> {
    debug!("GET {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(NetworkFailure::from_status(status, &text));
    }

    serde_json::from_str(&text).map_err(NetworkFailure::decode)
}

/// Sends a JSON POST request and decodes the JSON response regardless of status.
///
/// APIs such as the Telegram Bot API describe rejections in the body of a
/// non-2xx response, so the caller decides how to treat the status. A body
/// that cannot be decoded is reported by status when the status is an error.
///
/// # Errors
///
/// Returns a [`NetworkFailure`] on transport errors or an undecodable body.
pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<JsonResponse<T>, NetworkFailure> {
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    let text = response.text().await?;

    match serde_json::from_str(&text) {
        Ok(body) => Ok(JsonResponse { status, body }),
        Err(_) if !status.is_success() => Err(NetworkFailure::from_status(status, &text)),
        Err(e) => Err(NetworkFailure::decode(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorType;
    use httptest::{all_of, matchers::*, responders::*, Expectation, Server};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        value: String,
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/echo"))
                .respond_with(json_encoded(serde_json::json!({ "value": "hi" }))),
        );

        let client = reqwest::Client::new();
        let echo: Echo = get_json(&client, &server.url_str("/echo")).await.unwrap();
        assert_eq!(echo.value, "hi");
    }

    #[tokio::test]
    async fn test_get_json_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/echo"))
                .respond_with(status_code(502).body("upstream down")),
        );

        let client = reqwest::Client::new();
        let err = get_json::<Echo>(&client, &server.url_str("/echo"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorType::HttpRequestBadGateway);
        assert!(err.message.contains("upstream down"));
    }

    #[tokio::test]
    async fn test_get_json_unparseable_body() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/echo"))
                .respond_with(status_code(200).body("<html>oops</html>")),
        );

        let client = reqwest::Client::new();
        let err = get_json::<Echo>(&client, &server.url_str("/echo"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorType::HttpRequestDecodeError);
    }

    #[tokio::test]
    async fn test_post_json_keeps_error_body() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/send"),
                request::body(json_decoded(eq(serde_json::json!({ "value": "x" })))),
            ])
            .respond_with(
                status_code(400)
                    .append_header("Content-Type", "application/json")
                    .body(r#"{"value":"rejected"}"#),
            ),
        );

        let client = reqwest::Client::new();
        let response: JsonResponse<Echo> = post_json(
            &client,
            &server.url_str("/send"),
            &serde_json::json!({ "value": "x" }),
        )
        .await
        .unwrap();
        assert_eq!(response.status, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(response.body.value, "rejected");
    }
}
