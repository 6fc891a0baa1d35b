use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod stores;
mod trips;
mod users;

pub use stores::StoreDraft;
pub use trips::TripDraft;
pub use users::NewUser;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// Vehicle allow-list. Empty means any vehicle identifier is accepted.
    fleet: Vec<String>,
    reset_secret: String,
    reset_token_ttl_secs: i64,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The injected vehicle allow-list.
    pub fn fleet(&self) -> &[String] {
        &self.fleet
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_username(value: &str) -> ResultEngine<String> {
    use unicode_normalization::UnicodeNormalization;

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(
            "username must not be empty".to_string(),
        ));
    }
    Ok(trimmed.nfc().collect())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    fleet: Vec<String>,
    reset_secret: String,
    reset_token_ttl_secs: Option<i64>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the vehicle allow-list. An empty list disables the check.
    pub fn fleet(mut self, fleet: Vec<String>) -> EngineBuilder {
        self.fleet = fleet;
        self
    }

    /// Pass the secret used to sign password-reset tokens.
    pub fn reset_secret(mut self, secret: &str) -> EngineBuilder {
        self.reset_secret = secret.to_string();
        self
    }

    /// Pass the reset-token lifetime in seconds. Defaults to 3600.
    pub fn reset_token_ttl_secs(mut self, ttl_secs: i64) -> EngineBuilder {
        self.reset_token_ttl_secs = Some(ttl_secs);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        if self.reset_secret.is_empty() {
            return Err(EngineError::Validation(
                "reset token secret must not be empty".to_string(),
            ));
        }

        let fleet = self
            .fleet
            .into_iter()
            .filter_map(|vehicle| normalize_optional_text(Some(&vehicle)))
            .collect();

        Ok(Engine {
            database: self.database,
            fleet,
            reset_secret: self.reset_secret,
            reset_token_ttl_secs: self.reset_token_ttl_secs.unwrap_or(3600),
        })
    }
}
