//! Expense ledger rows.
//!
//! Rows are read per category label ordered by the `recorded_at`
//! timestamp string (`YYYY-MM-DD HH:MM:SS.ffffff`, sortable as text).
//! The pair is indexed but not unique: two expenses stamped with the same
//! instant are both kept, told apart by the surrogate `id`.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_label: String,
    pub recorded_at: String,
    pub amount: i64,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A single logged expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    pub category_label: String,
    pub amount: i64,
    pub recorded_at: String,
    pub user_id: String,
}

impl ExpenseRecord {
    /// Date part of `recorded_at`, i.e. everything before the first space.
    pub fn date(&self) -> &str {
        self.recorded_at
            .split(' ')
            .next()
            .unwrap_or(self.recorded_at.as_str())
    }
}

impl From<Model> for ExpenseRecord {
    fn from(model: Model) -> Self {
        Self {
            category_label: model.category_label,
            amount: model.amount,
            recorded_at: model.recorded_at,
            user_id: model.user_id,
        }
    }
}

impl From<&ExpenseRecord> for ActiveModel {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            id: ActiveValue::NotSet,
            category_label: ActiveValue::Set(record.category_label.clone()),
            recorded_at: ActiveValue::Set(record.recorded_at.clone()),
            amount: ActiveValue::Set(record.amount),
            user_id: ActiveValue::Set(record.user_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_is_prefix_before_space() {
        let record = ExpenseRecord {
            category_label: "Food".to_string(),
            amount: 250,
            recorded_at: "2024-05-01 12:30:00.000000".to_string(),
            user_id: "u1".to_string(),
        };
        assert_eq!(record.date(), "2024-05-01");
    }
}
