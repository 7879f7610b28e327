use std::{sync::Mutex, time::Duration};

use crate::foundation::error::{ReelError, ReelResult};

/// Environment variable holding the document-store connection string.
pub const DOCSTORE_URI_ENV: &str = "MONGODB_URI";
/// Environment variable holding the database name.
pub const DOCSTORE_DB_ENV: &str = "MONGODB_DB";

/// Connection settings for the document store. Absent values disable the connector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocStoreConfig {
    pub uri: Option<String>,
    pub database: Option<String>,
}

impl DocStoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            uri: get(DOCSTORE_URI_ENV),
            database: get(DOCSTORE_DB_ENV),
        }
    }

    /// Names of the required settings that are missing.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.uri.is_none() {
            out.push(DOCSTORE_URI_ENV);
        }
        if self.database.is_none() {
            out.push(DOCSTORE_DB_ENV);
        }
        out
    }

    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Retry schedule for establishing the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(5),
        }
    }
}

/// The third-party client library behind the connector.
pub trait DocStoreDriver: Send + Sync {
    type Client: Clone + Send + Sync;
    type Database: Clone + Send + Sync;

    /// Open a client for `uri`.
    fn connect(&self, uri: &str) -> ReelResult<Self::Client>;

    /// Database handle named `name` on an open client.
    fn database(&self, client: &Self::Client, name: &str) -> Self::Database;
}

/// An open client and its database handle.
#[derive(Clone, Debug)]
pub struct DocConnection<C, D> {
    pub client: C,
    pub db: D,
}

/// Connects once with bounded retries and hands out the cached connection afterwards.
pub struct DocStoreConnector<D: DocStoreDriver> {
    driver: D,
    config: DocStoreConfig,
    policy: RetryPolicy,
    cached: Mutex<Option<DocConnection<D::Client, D::Database>>>,
}

impl<D: DocStoreDriver> DocStoreConnector<D> {
    /// Create the connector. Missing configuration is reported as a warning and
    /// disables the connector; it is not an error here.
    pub fn new(driver: D, config: DocStoreConfig, policy: RetryPolicy) -> Self {
        for key in config.missing() {
            tracing::warn!("{key} is not defined. Document store features will be disabled.");
        }
        Self {
            driver,
            config,
            policy,
            cached: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Why the connector is disabled, if it is.
    pub fn disabled_reason(&self) -> Option<String> {
        let missing = self.config.missing();
        if missing.is_empty() {
            None
        } else {
            Some(format!("missing {}", missing.join(", ")))
        }
    }

    /// Return the cached connection, or connect with up to `max_attempts` tries.
    #[tracing::instrument(skip(self))]
    pub fn connect(&self) -> ReelResult<DocConnection<D::Client, D::Database>> {
        let (Some(uri), Some(db_name)) = (&self.config.uri, &self.config.database) else {
            return Err(ReelError::not_configured(format!(
                "document store is not configured; set {DOCSTORE_URI_ENV} and {DOCSTORE_DB_ENV}"
            )));
        };

        let mut cached = self
            .cached
            .lock()
            .map_err(|_| ReelError::connector("document store cache lock poisoned"))?;
        if let Some(conn) = cached.as_ref() {
            return Ok(conn.clone());
        }

        let client = self.connect_with_retry(uri)?;
        let conn = DocConnection {
            db: self.driver.database(&client, db_name),
            client,
        };
        *cached = Some(conn.clone());
        Ok(conn)
    }

    /// Connect eagerly when configured, logging instead of returning failures.
    pub fn warm_up(&self) {
        if !self.is_enabled() {
            return;
        }
        if let Err(err) = self.connect() {
            tracing::error!(error = %err, "document store warm-up failed");
        }
    }

    fn connect_with_retry(&self, uri: &str) -> ReelResult<D::Client> {
        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.driver.connect(uri) {
                Ok(client) => return Ok(client),
                Err(err) => {
                    tracing::warn!(attempt, attempts, error = %err, "failed to connect to document store, retrying");
                    if attempt < attempts && !self.policy.backoff.is_zero() {
                        std::thread::sleep(self.policy.backoff);
                    }
                }
            }
        }
        Err(ReelError::connector(format!(
            "failed to connect to document store after {attempts} attempts"
        )))
    }
}

impl<D: DocStoreDriver> std::fmt::Debug for DocStoreConnector<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStoreConnector")
            .field("enabled", &self.is_enabled())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/connect/docstore.rs"]
mod tests;
