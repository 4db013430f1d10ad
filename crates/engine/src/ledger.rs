//! Ledger store.
//!
//! [`Ledger`] is the seam between the dispatcher and persistence. The
//! sea-orm backed [`Engine`] is the production implementation and also
//! carries the administrative operations used by the admin CLI.

use std::future::Future;

use sea_orm::{DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    EngineError, ResultEngine,
    expenses::{self, ExpenseRecord},
};

/// Number of rows returned by a recent-expenses query.
pub const RECENT_LIMIT: u64 = 10;

pub trait Ledger {
    /// Append a record. Rows are never replaced, even when another one
    /// carries the same category label and `recorded_at`.
    fn insert(&self, record: &ExpenseRecord) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Records of one category, newest first, at most `limit` rows.
    /// Same-instant records come in reverse insertion order.
    fn query_recent(
        &self,
        category_label: &str,
        limit: u64,
    ) -> impl Future<Output = ResultEngine<Vec<ExpenseRecord>>> + Send;
}

#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// All records (optionally of one category), newest first.
    pub async fn list_expenses(
        &self,
        category_label: Option<&str>,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<ExpenseRecord>> {
        let mut query = expenses::Entity::find();
        if let Some(label) = category_label {
            query = query.filter(expenses::Column::CategoryLabel.eq(label));
        }
        let rows = query
            .order_by_desc(expenses::Column::RecordedAt)
            .order_by_desc(expenses::Column::Id)
            .limit(limit)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(ExpenseRecord::from).collect())
    }

    /// Delete one record. When several share the same key the most recently
    /// inserted one goes first.
    pub async fn delete_expense(
        &self,
        category_label: &str,
        recorded_at: &str,
    ) -> ResultEngine<()> {
        let row = expenses::Entity::find()
            .filter(expenses::Column::CategoryLabel.eq(category_label))
            .filter(expenses::Column::RecordedAt.eq(recorded_at))
            .order_by_desc(expenses::Column::Id)
            .one(&self.database)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("{category_label} @ {recorded_at}"))
            })?;

        expenses::Entity::delete_by_id(row.id)
            .exec(&self.database)
            .await?;
        Ok(())
    }
}

impl Ledger for Engine {
    async fn insert(&self, record: &ExpenseRecord) -> ResultEngine<()> {
        expenses::Entity::insert(expenses::ActiveModel::from(record))
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    async fn query_recent(
        &self,
        category_label: &str,
        limit: u64,
    ) -> ResultEngine<Vec<ExpenseRecord>> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::CategoryLabel.eq(category_label))
            .order_by_desc(expenses::Column::RecordedAt)
            .order_by_desc(expenses::Column::Id)
            .limit(limit)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(ExpenseRecord::from).collect())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
