pub use sea_orm_migration::prelude::*;

mod m20241001_000000_expenses;

/// Local SQLite file used by the command line tools when `DATABASE_URL`
/// is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./kakeibo.db?mode=rwc";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241001_000000_expenses::Migration)]
    }
}
