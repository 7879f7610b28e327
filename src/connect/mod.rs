//! Optional external data-store connectors used by the surrounding site.
//!
//! Both degrade to a logged warning when unconfigured instead of failing at startup.

mod docstore;
mod hosted;

pub use docstore::{
    DOCSTORE_DB_ENV, DOCSTORE_URI_ENV, DocConnection, DocStoreConfig, DocStoreConnector,
    DocStoreDriver, RetryPolicy,
};
pub use hosted::{
    HOSTED_ANON_KEY_ENV, HOSTED_SERVICE_KEY_ENV, HOSTED_URL_ENV, HostedBackend, HostedClient,
    HostedConfig, KeyKind, PLACEHOLDER_KEY, PLACEHOLDER_URL, PUBLIC_ENV_PREFIX, handle_error,
};
