//! Command interpreter and ledger dispatcher.
//!
//! [`Dispatcher::dispatch`] turns one chat message into one reply string.
//! It never fails: validation problems get a specific message, anything
//! unexpected is logged and answered with [`GENERIC_ERROR`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    categories::CategoryTable,
    commands::{Command, ParseError, parse_command},
    error::{DispatchError, ErrorKind},
    expenses::ExpenseRecord,
    ledger::{Ledger, RECENT_LIMIT},
};

pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";
pub const INVALID_CATEGORY: &str = "Invalid item name.";
pub const EMPTY_RESULT: &str = "No recent data available for the selected item.";
pub const QUERY_USAGE: &str = "L or l + the initial letter of the item";
pub const INVALID_AMOUNT: &str = "The amount must be a positive whole number.";

const HELP_HEADER: &str = "The initial letter of the item + amount.";
const RECORDED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A text message handed over by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomingMessage {
    pub text: String,
    pub user_id: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Dispatcher<L> {
    categories: CategoryTable,
    ledger: L,
    timezone: Tz,
    help: String,
}

impl<L: Ledger> Dispatcher<L> {
    pub fn new(categories: CategoryTable, ledger: L, timezone: Tz) -> Self {
        let help = render_help(&categories);
        Self {
            categories,
            ledger,
            timezone,
            help,
        }
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Interpret `message` and return the reply for the sender.
    pub async fn dispatch(&self, message: &IncomingMessage) -> String {
        match self.try_dispatch(message).await {
            Ok(reply) => reply,
            Err(err) => {
                let kind = err.kind();
                if kind.is_validation() {
                    tracing::info!(
                        user_id = %message.user_id,
                        command = %message.text,
                        "rejected command: {err}"
                    );
                } else {
                    tracing::error!(
                        user_id = %message.user_id,
                        command = %message.text,
                        "failed to process command: {err}"
                    );
                }
                self.message_for(kind).to_string()
            }
        }
    }

    /// Same as [`dispatch`](Self::dispatch) but keeps the typed error.
    pub async fn try_dispatch(&self, message: &IncomingMessage) -> Result<String, DispatchError> {
        let command = match parse_command(&message.text) {
            Ok(command) => command,
            Err(ParseError::MalformedQuery) => {
                return Err(DispatchError::MalformedQuery(message.text.trim().to_string()));
            }
            Err(ParseError::MalformedRecord) => return Ok(self.help.clone()),
        };

        match command {
            Command::Help => Ok(self.help.clone()),
            Command::Recent { code } => self.recent(code).await,
            Command::Record { code, amount } => self.record(code, amount, message).await,
        }
    }

    fn message_for(&self, kind: ErrorKind) -> &'static str {
        match kind {
            ErrorKind::InvalidCategory => INVALID_CATEGORY,
            ErrorKind::InvalidAmount => INVALID_AMOUNT,
            ErrorKind::EmptyResult => EMPTY_RESULT,
            ErrorKind::MalformedCommand => QUERY_USAGE,
            ErrorKind::SystemFailure => GENERIC_ERROR,
        }
    }

    async fn recent(&self, code: &str) -> Result<String, DispatchError> {
        let label = self
            .categories
            .label(code)
            .ok_or_else(|| DispatchError::InvalidCategory(code.to_string()))?;

        let records = self.ledger.query_recent(label, RECENT_LIMIT).await?;
        if records.is_empty() {
            return Err(DispatchError::EmptyResult(label.to_string()));
        }
        tracing::debug!(category = label, rows = records.len(), "recent expenses");

        let mut reply = label.to_string();
        for record in &records {
            reply.push_str(&format!("\n{} : {}", record.date(), record.amount));
        }
        Ok(reply)
    }

    async fn record(
        &self,
        code: &str,
        amount: &str,
        message: &IncomingMessage,
    ) -> Result<String, DispatchError> {
        let label = self
            .categories
            .label(code)
            .ok_or_else(|| DispatchError::InvalidCategory(code.to_string()))?;

        let amount: i64 = amount
            .parse()
            .map_err(|_| DispatchError::UnparsableAmount(amount.to_string()))?;
        if amount <= 0 {
            return Err(DispatchError::NonPositiveAmount(amount));
        }

        let record = ExpenseRecord {
            category_label: label.to_string(),
            amount,
            recorded_at: self.recorded_at(message.received_at),
            user_id: message.user_id.clone(),
        };
        self.ledger.insert(&record).await?;
        tracing::info!(
            category = label,
            amount,
            user_id = %record.user_id,
            "expense recorded"
        );

        Ok(format!("{label}: {amount} has been added."))
    }

    fn recorded_at(&self, received_at: DateTime<Utc>) -> String {
        received_at
            .with_timezone(&self.timezone)
            .format(RECORDED_AT_FORMAT)
            .to_string()
    }
}

fn render_help(categories: &CategoryTable) -> String {
    let mut help = HELP_HEADER.to_string();
    for category in categories.iter() {
        help.push_str("\n- ");
        help.push_str(&category.label);
    }
    help
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;
    use sea_orm::DbErr;

    use super::*;
    use crate::{EngineError, ResultEngine};

    #[derive(Default)]
    struct MemoryLedger {
        rows: Mutex<Vec<ExpenseRecord>>,
    }

    impl Ledger for MemoryLedger {
        async fn insert(&self, record: &ExpenseRecord) -> ResultEngine<()> {
            self.rows.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn query_recent(
            &self,
            category_label: &str,
            limit: u64,
        ) -> ResultEngine<Vec<ExpenseRecord>> {
            let mut rows: Vec<_> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.category_label == category_label)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
            rows.truncate(limit as usize);
            Ok(rows)
        }
    }

    struct BrokenLedger;

    impl Ledger for BrokenLedger {
        async fn insert(&self, _record: &ExpenseRecord) -> ResultEngine<()> {
            Err(EngineError::Database(DbErr::Custom("disk full".to_string())))
        }

        async fn query_recent(
            &self,
            _category_label: &str,
            _limit: u64,
        ) -> ResultEngine<Vec<ExpenseRecord>> {
            Err(EngineError::Database(DbErr::Custom("disk full".to_string())))
        }
    }

    fn message(text: &str) -> IncomingMessage {
        IncomingMessage {
            text: text.to_string(),
            user_id: "U123".to_string(),
            received_at: Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap(),
        }
    }

    #[test]
    fn help_lists_labels_in_order() {
        let dispatcher = Dispatcher::new(
            CategoryTable::default(),
            MemoryLedger::default(),
            chrono_tz::UTC,
        );
        let help = dispatcher.help();
        assert!(help.starts_with("The initial letter of the item + amount.\n- Food\n"));
        assert!(help.ends_with("- Internet\n- Others"));
    }

    #[tokio::test]
    async fn recorded_at_uses_configured_timezone() {
        let dispatcher = Dispatcher::new(
            CategoryTable::default(),
            MemoryLedger::default(),
            chrono_tz::Asia::Tokyo,
        );
        let reply = dispatcher.dispatch(&message("f 250")).await;
        assert_eq!(reply, "Food: 250 has been added.");

        let rows = dispatcher.ledger().rows.lock().unwrap().clone();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].recorded_at, "2024-05-02 08:30:00.000000");
        assert_eq!(rows[0].user_id, "U123");
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let dispatcher = Dispatcher::new(
            CategoryTable::default(),
            MemoryLedger::default(),
            chrono_tz::UTC,
        );
        assert_eq!(dispatcher.dispatch(&message("F 0")).await, INVALID_AMOUNT);
        assert_eq!(dispatcher.dispatch(&message("F -5")).await, INVALID_AMOUNT);
        assert!(dispatcher.ledger().rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failures_get_generic_reply() {
        let dispatcher = Dispatcher::new(CategoryTable::default(), BrokenLedger, chrono_tz::UTC);
        assert_eq!(dispatcher.dispatch(&message("F 100")).await, GENERIC_ERROR);
        assert_eq!(dispatcher.dispatch(&message("lf")).await, GENERIC_ERROR);

        let err = dispatcher.try_dispatch(&message("lf")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SystemFailure);
    }

    #[tokio::test]
    async fn validation_does_not_touch_broken_store() {
        let dispatcher = Dispatcher::new(CategoryTable::default(), BrokenLedger, chrono_tz::UTC);
        assert_eq!(dispatcher.dispatch(&message("X 100")).await, INVALID_CATEGORY);
        assert_eq!(dispatcher.dispatch(&message("lx")).await, INVALID_CATEGORY);
        assert_eq!(dispatcher.dispatch(&message("l")).await, QUERY_USAGE);
        assert_eq!(dispatcher.dispatch(&message("help")).await, dispatcher.help());
    }

    #[tokio::test]
    async fn error_kinds() {
        let dispatcher = Dispatcher::new(
            CategoryTable::default(),
            MemoryLedger::default(),
            chrono_tz::UTC,
        );
        assert_eq!(kind(&dispatcher, "Z 1").await, ErrorKind::InvalidCategory);
        assert_eq!(kind(&dispatcher, "F abc").await, ErrorKind::SystemFailure);
        assert_eq!(kind(&dispatcher, "F -1").await, ErrorKind::InvalidAmount);
        assert_eq!(kind(&dispatcher, "lf").await, ErrorKind::EmptyResult);
        assert_eq!(kind(&dispatcher, "lfx").await, ErrorKind::MalformedCommand);
    }

    async fn kind(dispatcher: &Dispatcher<MemoryLedger>, text: &str) -> ErrorKind {
        dispatcher
            .try_dispatch(&message(text))
            .await
            .unwrap_err()
            .kind()
    }
}
