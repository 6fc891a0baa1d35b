//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for the env filter, e.g. `info` or `debug`.
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    /// In-memory database, lost on shutdown. Useful for trying things out.
    Memory,
    /// Sqlite file at the given path, created when missing.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Secret used to sign password-reset tokens. Must not be empty.
    pub reset_secret: String,
    pub reset_token_ttl_secs: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Fleet {
    /// Vehicle allow-list. Leave empty to accept any identifier.
    pub vehicles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub auth: Auth,
    pub fleet: Option<Fleet>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
