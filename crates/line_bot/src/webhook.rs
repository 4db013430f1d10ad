//! LINE webhook payloads and the callback endpoint.
//!
//! Only text messages with a known sender reach the dispatcher; follow,
//! postback and media events are acknowledged and dropped.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use engine::{IncomingMessage, Ledger};
use serde::{Deserialize, Serialize};

use crate::{WebhookError, reply::Replier, server::ServerState};

#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    Message {
        #[serde(default)]
        reply_token: Option<String>,
        #[serde(default)]
        source: Option<Source>,
        #[serde(default)]
        timestamp: Option<i64>,
        message: EventMessage,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventMessage {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// A text message ready for the dispatcher, plus where to answer.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TextEvent {
    pub reply_token: String,
    pub message: IncomingMessage,
}

impl Event {
    pub(crate) fn into_text_event(self) -> Option<TextEvent> {
        let Event::Message {
            reply_token,
            source,
            timestamp,
            message: EventMessage::Text { text },
        } = self
        else {
            return None;
        };

        let reply_token = reply_token?;
        let user_id = source?.user_id?;
        let received_at = timestamp
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_else(Utc::now);

        Some(TextEvent {
            reply_token,
            message: IncomingMessage {
                text,
                user_id,
                received_at,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Ack {
    status: &'static str,
}

pub(crate) async fn callback<L, R>(
    State(state): State<ServerState<L, R>>,
    body: String,
) -> Result<Json<Ack>, WebhookError>
where
    L: Ledger + Send + Sync + 'static,
    R: Replier,
{
    let payload: WebhookBody = serde_json::from_str(&body)?;
    tracing::debug!(
        destination = payload.destination.as_deref().unwrap_or_default(),
        events = payload.events.len(),
        "webhook received"
    );

    for event in payload.events {
        let Some(event) = event.into_text_event() else {
            tracing::debug!("skipping non-text event");
            continue;
        };

        let reply = state.dispatcher.dispatch(&event.message).await;
        if let Err(err) = state.replier.reply(&event.reply_token, &reply).await {
            tracing::error!(
                user_id = %event.message.user_id,
                "failed to send reply: {err}"
            );
        }
    }

    Ok(Json(Ack { status: "ok" }))
}
