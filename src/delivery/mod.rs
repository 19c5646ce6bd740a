//! Message delivery to the bot messaging endpoint.
//!
//! The Telegram Bot API `sendMessage` method is the only delivery target. A
//! message counts as delivered only when the API answers `{"ok": true}`.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error_handling::NotifyError;
use crate::http::post_json;
use crate::message::ParseMode;
use crate::NotifierConfig;

/// Delivers formatted text to a chat.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Sends `text`, to be interpreted with `parse_mode`.
    async fn send(&self, text: &str, parse_mode: ParseMode) -> Result<(), NotifyError>;
}

/// Request body of `sendMessage`.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: ParseMode,
}

/// Response envelope of the Bot API.
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramSender {
    client: Arc<reqwest::Client>,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramSender {
    /// Creates a sender for one bot and chat.
    pub fn new(
        client: Arc<reqwest::Client>,
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Creates a sender using the bot API base, token and chat of `config`.
    pub fn from_config(client: Arc<reqwest::Client>, config: &NotifierConfig) -> Self {
        Self::new(
            client,
            &config.bot_api_base,
            &config.bot_token,
            &config.chat_id,
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

// The token is a credential and must not end up in logs
impl std::fmt::Debug for TelegramSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSender")
            .field("api_base", &self.api_base)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, text: &str, parse_mode: ParseMode) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode,
        };
        debug!(
            "Sending {} byte message to chat {} ({})",
            text.len(),
            self.chat_id,
            parse_mode
        );

        let response = post_json::<_, BotApiResponse>(&self.client, &self.endpoint(), &request)
            .await
            .map_err(NotifyError::Delivery)?;

        if response.status.is_success() && response.body.ok {
            return Ok(());
        }
        Err(NotifyError::DeliveryRejected {
            status: response.status.as_u16(),
            description: response
                .body
                .description
                .unwrap_or_else(|| "no description".to_string()),
        })
    }
}
