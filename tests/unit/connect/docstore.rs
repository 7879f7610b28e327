use std::sync::atomic::{AtomicU32, Ordering};

use super::*;

struct FlakyDriver {
    failures_before_success: u32,
    calls: AtomicU32,
}

impl FlakyDriver {
    fn new(failures_before_success: u32) -> Self {
        Self {
            failures_before_success,
            calls: AtomicU32::new(0),
        }
    }
}

impl DocStoreDriver for FlakyDriver {
    type Client = String;
    type Database = String;

    fn connect(&self, uri: &str) -> ReelResult<Self::Client> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures_before_success {
            return Err(ReelError::connector("connection refused"));
        }
        Ok(format!("client:{uri}"))
    }

    fn database(&self, client: &Self::Client, name: &str) -> Self::Database {
        format!("{client}/{name}")
    }
}

fn configured() -> DocStoreConfig {
    DocStoreConfig {
        uri: Some("mongodb://localhost".to_string()),
        database: Some("site".to_string()),
    }
}

fn fast() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        backoff: Duration::ZERO,
    }
}

#[test]
fn default_policy_is_five_attempts_five_seconds_apart() {
    let p = RetryPolicy::default();
    assert_eq!(p.max_attempts, 5);
    assert_eq!(p.backoff, Duration::from_secs(5));
}

#[test]
fn connects_after_transient_failures() {
    let conn = DocStoreConnector::new(FlakyDriver::new(3), configured(), fast());
    let c = conn.connect().unwrap();
    assert_eq!(c.client, "client:mongodb://localhost");
    assert_eq!(c.db, "client:mongodb://localhost/site");
    assert_eq!(conn.driver.calls.load(Ordering::SeqCst), 4);
}

#[test]
fn gives_up_after_max_attempts() {
    let conn = DocStoreConnector::new(FlakyDriver::new(u32::MAX), configured(), fast());
    let err = conn.connect().unwrap_err();
    assert!(matches!(err, ReelError::Connector(_)));
    assert!(err.to_string().contains("after 5 attempts"));
    assert_eq!(conn.driver.calls.load(Ordering::SeqCst), 5);
}

#[test]
fn connection_is_cached_for_reuse() {
    let conn = DocStoreConnector::new(FlakyDriver::new(0), configured(), fast());
    conn.connect().unwrap();
    conn.connect().unwrap();
    conn.warm_up();
    assert_eq!(conn.driver.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn missing_configuration_disables_without_touching_driver() {
    let conn = DocStoreConnector::new(
        FlakyDriver::new(0),
        DocStoreConfig {
            uri: Some("mongodb://localhost".to_string()),
            database: None,
        },
        fast(),
    );
    assert!(!conn.is_enabled());
    assert_eq!(conn.disabled_reason().unwrap(), "missing MONGODB_DB");
    conn.warm_up();
    let err = conn.connect().unwrap_err();
    assert!(matches!(err, ReelError::NotConfigured(_)));
    assert_eq!(conn.driver.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn config_from_lookup_ignores_empty_values() {
    let cfg = DocStoreConfig::from_lookup(|key| match key {
        "MONGODB_URI" => Some("mongodb://db".to_string()),
        "MONGODB_DB" => Some(String::new()),
        _ => None,
    });
    assert_eq!(cfg.uri.as_deref(), Some("mongodb://db"));
    assert_eq!(cfg.database, None);
    assert_eq!(cfg.missing(), vec!["MONGODB_DB"]);
}
