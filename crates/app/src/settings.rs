//! Handles settings for the application. Configuration is read from
//! `config/settings.toml` (optional) and `KAKEIBO__*` environment variables,
//! e.g. `KAKEIBO__LINE__CHANNEL_ACCESS_TOKEN`.
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use engine::{CategoryTable, EngineError};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    pub timezone: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: "Asia/Tokyo".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("kakeibo.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct CategorySetting {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct Line {
    pub channel_access_token: String,
    pub bind: Option<String>,
    pub port: u16,
    pub api_base: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    #[serde(default)]
    pub allowed_users: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub categories: Vec<CategorySetting>,
    pub line: Option<Line>,
    pub telegram: Option<Telegram>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false))
            .add_source(Environment::with_prefix("KAKEIBO").separator("__"));
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// The configured category table, or the default one when none is set.
    pub fn category_table(&self) -> Result<CategoryTable, EngineError> {
        if self.categories.is_empty() {
            return Ok(CategoryTable::default());
        }
        CategoryTable::new(
            self.categories
                .iter()
                .map(|c| (c.code.as_str(), c.label.as_str())),
        )
    }
}
