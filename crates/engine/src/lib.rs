//! Expense ledger core.
//!
//! A chat message is parsed by [`commands`], validated against a
//! [`CategoryTable`] and executed against a [`Ledger`] by the
//! [`Dispatcher`], which always answers with a reply string.

pub use categories::{Category, CategoryTable};
pub use dispatcher::{Dispatcher, GENERIC_ERROR, IncomingMessage};
pub use error::{DispatchError, EngineError, ErrorKind};
pub use expenses::ExpenseRecord;
pub use ledger::{Engine, EngineBuilder, Ledger, RECENT_LIMIT};

pub mod categories;
pub mod commands;
pub mod dispatcher;
mod error;
pub mod expenses;
mod ledger;

pub type ResultEngine<T> = Result<T, EngineError>;
