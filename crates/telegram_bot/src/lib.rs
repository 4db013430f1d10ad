//! Telegram bot.
//!
//! Every text message from an allowed user is handed to the expense
//! dispatcher and the reply is sent back to the same chat.

use std::sync::Arc;

use engine::{Dispatcher as LedgerDispatcher, Engine};
use teloxide::prelude::*;

mod handlers;

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Option<Vec<UserId>>,
    dispatcher: Arc<LedgerDispatcher<Engine>>,
}

pub struct Bot {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    dispatcher: Arc<LedgerDispatcher<Engine>>,
}

impl Bot {
    pub fn new(
        token: &str,
        allowed_users: Option<Vec<UserId>>,
        dispatcher: Arc<LedgerDispatcher<Engine>>,
    ) -> Result<Self, String> {
        if token.trim().is_empty() {
            return Err("telegram token must not be empty".to_string());
        }

        Ok(Self {
            token: token.to_string(),
            allowed_users,
            dispatcher,
        })
    }

    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            dispatcher: Arc::clone(&self.dispatcher),
        };

        let handler =
            dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default)]
pub struct BotBuilder {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    dispatcher: Option<Arc<LedgerDispatcher<Engine>>>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn allowed_users(mut self, allowed_users: Vec<UserId>) -> BotBuilder {
        if !allowed_users.is_empty() {
            self.allowed_users = Some(allowed_users);
        }
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<LedgerDispatcher<Engine>>) -> BotBuilder {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        let dispatcher = self
            .dispatcher
            .ok_or_else(|| "missing expense dispatcher".to_string())?;
        Bot::new(&self.token, self.allowed_users, dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_dispatcher() {
        let err = Bot::builder().token("123:abc").build().err();
        assert_eq!(err.as_deref(), Some("missing expense dispatcher"));
    }

    #[test]
    fn empty_allowed_users_means_everyone() {
        let builder = Bot::builder().allowed_users(Vec::new());
        assert!(builder.allowed_users.is_none());

        let builder = Bot::builder().allowed_users(vec![UserId(7)]);
        assert_eq!(builder.allowed_users, Some(vec![UserId(7)]));
    }
}
