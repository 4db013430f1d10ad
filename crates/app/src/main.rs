use std::sync::Arc;

use chrono_tz::Tz;
use engine::{Dispatcher, Engine};
use migration::{Migrator, MigratorTrait};
use settings::Database;
use teloxide::types::UserId;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kakeibo={level},engine={level},line_bot={level},telegram_bot={level}",
            level = settings.app.level
        ))
        .init();

    let timezone: Tz = settings
        .app
        .timezone
        .parse()
        .map_err(|err| format!("invalid timezone '{}': {err}", settings.app.timezone))?;
    let categories = settings.category_table()?;
    tracing::info!(
        categories = categories.len(),
        %timezone,
        "Loaded category table"
    );

    let db = parse_database(&settings.database).await?;
    let engine = Engine::builder().database(db).build();
    let dispatcher = Arc::new(Dispatcher::new(categories, engine, timezone));

    if let Some(line) = settings.line {
        let dispatcher = Arc::clone(&dispatcher);
        tasks.spawn(async move {
            tracing::info!("Found LINE settings...");
            let client =
                match line_bot::LineClient::new(&line.channel_access_token, line.api_base.as_deref())
                {
                    Ok(client) => client,
                    Err(err) => {
                        tracing::error!("failed to build LINE client: {err}");
                        return;
                    }
                };
            let bind = line.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, line.port);
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind webhook listener: {err}");
                    return;
                }
            };
            if let Err(err) = line_bot::run_with_listener(dispatcher, client, listener).await {
                tracing::error!("webhook server failed: {err}");
            }
        });
    }

    if let Some(telegram) = settings.telegram {
        let dispatcher = Arc::clone(&dispatcher);
        tasks.spawn(async move {
            tracing::info!("Found telegram settings...");
            let allowed_users = telegram.allowed_users.into_iter().map(UserId).collect();
            match telegram_bot::Bot::builder()
                .token(&telegram.token)
                .allowed_users(allowed_users)
                .dispatcher(dispatcher)
                .build()
            {
                Ok(bot) => bot.run().await,
                Err(err) => tracing::error!("failed to initialize telegram bot: {err}"),
            }
        });
    }

    if tasks.is_empty() {
        tracing::warn!("No transport configured, nothing to do");
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
