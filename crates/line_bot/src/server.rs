use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use engine::{Dispatcher, Ledger};

use crate::{reply::Replier, webhook};

pub struct ServerState<L, R> {
    pub dispatcher: Arc<Dispatcher<L>>,
    pub replier: R,
}

impl<L, R: Clone> Clone for ServerState<L, R> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            replier: self.replier.clone(),
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn router<L, R>(state: ServerState<L, R>) -> Router
where
    L: Ledger + Send + Sync + 'static,
    R: Replier,
{
    Router::new()
        .route("/callback", post(webhook::callback::<L, R>))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run_with_listener<L, R>(
    dispatcher: Arc<Dispatcher<L>>,
    replier: R,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error>
where
    L: Ledger + Send + Sync + 'static,
    R: Replier,
{
    let addr = listener.local_addr()?;
    tracing::info!("LINE webhook listening on {}", addr);

    let state = ServerState {
        dispatcher,
        replier,
    };

    axum::serve(listener, router(state)).await
}
