//! Outbound replies through the LINE Messaging API.

use std::future::Future;

use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.line.me";

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("invalid channel access token: {0}")]
    InvalidToken(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
}

/// Sends a text answer for a webhook event.
pub trait Replier: Clone + Send + Sync + 'static {
    fn reply(
        &self,
        reply_token: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), ReplyError>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone, Debug)]
pub struct LineClient {
    client: Client,
    base_url: String,
}

impl LineClient {
    pub fn new(channel_access_token: &str, base_url: Option<&str>) -> Result<Self, ReplyError> {
        let mut auth = header::HeaderValue::try_from(format!("Bearer {channel_access_token}"))
            .map_err(|err| ReplyError::InvalidToken(err.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or(DEFAULT_API_BASE).to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Replier for LineClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), ReplyError> {
        let body = ReplyRequest {
            reply_token,
            messages: [TextMessage { kind: "text", text }],
        };

        let resp = self
            .client
            .post(self.url("/v2/bot/message/reply"))
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(err) => err.message,
            Err(_) => "LINE API error".to_string(),
        };
        Err(ReplyError::Server { status, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_body_shape() {
        let body = ReplyRequest {
            reply_token: "token",
            messages: [TextMessage {
                kind: "text",
                text: "Food: 100 has been added.",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "replyToken": "token",
                "messages": [{"type": "text", "text": "Food: 100 has been added."}]
            })
        );
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = LineClient::new("secret", Some("http://localhost:9000/")).unwrap();
        assert_eq!(
            client.url("/v2/bot/message/reply"),
            "http://localhost:9000/v2/bot/message/reply"
        );
    }

    #[test]
    fn token_with_newline_is_rejected() {
        assert!(matches!(
            LineClient::new("bad\ntoken", None),
            Err(ReplyError::InvalidToken(_))
        ));
    }
}
