use sea_orm::Database;
use sea_orm_migration::prelude::*;

use migration::{DEFAULT_DATABASE_URL, Migrator};

const USAGE: &str = "usage: migration [up|down|status]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let command = std::env::args().nth(1);
    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&db_url).await?;
    match command.as_deref().unwrap_or("up") {
        "up" => Migrator::up(&db, None).await?,
        // Only the newest migration is rolled back.
        "down" => Migrator::down(&db, Some(1)).await?,
        "status" => Migrator::status(&db).await?,
        other => {
            eprintln!("unknown command {other:?}\n{USAGE}");
            std::process::exit(2);
        }
    }
    Ok(())
}
