//! LINE webhook transport.
//!
//! Receives webhook events on `POST /callback`, hands every text message to
//! the [`engine::Dispatcher`] and answers through the LINE reply endpoint.
//! Request signatures are not verified here.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

pub use reply::{DEFAULT_API_BASE, LineClient, Replier, ReplyError};
pub use server::{ServerState, router, run_with_listener};

mod reply;
mod server;
pub mod webhook;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid webhook body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!("{self}");
        let status = match self {
            WebhookError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        };

        (
            status,
            Json(Error {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
