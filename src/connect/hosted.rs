use std::sync::OnceLock;

use crate::foundation::error::ReelError;

/// Environment variable holding the hosted backend's project URL.
pub const HOSTED_URL_ENV: &str = "SUPABASE_URL";
/// Privileged (server-side) key; bypasses row-level security.
pub const HOSTED_SERVICE_KEY_ENV: &str = "SUPABASE_SERVICE_ROLE_KEY";
/// Public key for client-side access.
pub const HOSTED_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
/// Prefix of the browser-exposed names (`NEXT_PUBLIC_SUPABASE_URL`, ...) a web deployment
/// sets; read when the plain name is absent.
pub const PUBLIC_ENV_PREFIX: &str = "NEXT_PUBLIC_";

/// URL the placeholder client points at when the backend is unconfigured.
pub const PLACEHOLDER_URL: &str = "https://placeholder.supabase.co";
/// Key the placeholder client carries.
pub const PLACEHOLDER_KEY: &str = "placeholder-key";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostedConfig {
    pub url: Option<String>,
    pub service_role_key: Option<String>,
    pub anon_key: Option<String>,
}

impl HostedConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as absent.
    ///
    /// The URL and anon key also fall back to their `NEXT_PUBLIC_` names. The service-role
    /// key never does: it must not be exposed to browsers.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let get_public =
            |key: &str| get(key).or_else(|| get(&format!("{PUBLIC_ENV_PREFIX}{key}")));
        Self {
            url: get_public(HOSTED_URL_ENV),
            service_role_key: get(HOSTED_SERVICE_KEY_ENV),
            anon_key: get_public(HOSTED_ANON_KEY_ENV),
        }
    }
}

/// Which credential a [`HostedClient`] was built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    ServiceRole,
    Anon,
    /// No key was configured.
    Missing,
    /// The client is the unconfigured placeholder.
    Placeholder,
}

/// Client handle for the hosted relational backend. Sessions are never persisted or
/// refreshed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostedClient {
    url: String,
    key: String,
    key_kind: KeyKind,
}

impl HostedClient {
    /// Build a client, preferring the service-role key over the anon key.
    ///
    /// Without a URL this returns a placeholder client that fails at use time; a warning
    /// is logged instead of an error.
    pub fn from_config(config: &HostedConfig) -> Self {
        let Some(url) = &config.url else {
            tracing::warn!(
                "{HOSTED_URL_ENV} is not defined. Hosted backend features will be disabled."
            );
            return Self::placeholder();
        };

        let (key, key_kind) = match (&config.service_role_key, &config.anon_key) {
            (Some(k), _) => (k.clone(), KeyKind::ServiceRole),
            (None, Some(k)) => (k.clone(), KeyKind::Anon),
            (None, None) => {
                tracing::warn!(
                    "hosted backend keys are not defined. Hosted backend features will be disabled."
                );
                (String::new(), KeyKind::Missing)
            }
        };

        Self {
            url: url.clone(),
            key,
            key_kind,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            url: PLACEHOLDER_URL.to_string(),
            key: PLACEHOLDER_KEY.to_string(),
            key_kind: KeyKind::Placeholder,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn key_kind(&self) -> KeyKind {
        self.key_kind
    }

    pub fn persists_session(&self) -> bool {
        false
    }

    pub fn auto_refreshes_token(&self) -> bool {
        false
    }

    /// Whether requests through this client can succeed at all.
    pub fn is_functional(&self) -> bool {
        matches!(self.key_kind, KeyKind::ServiceRole | KeyKind::Anon)
    }
}

/// Lazily constructed, process-wide hosted client.
#[derive(Debug)]
pub struct HostedBackend {
    config: HostedConfig,
    client: OnceLock<HostedClient>,
}

impl HostedBackend {
    pub fn new(config: HostedConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(HostedConfig::from_env())
    }

    /// The client, built on first use.
    pub fn client(&self) -> &HostedClient {
        self.client
            .get_or_init(|| HostedClient::from_config(&self.config))
    }

    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }
}

/// Log a failed backend operation and turn it into an error for the caller.
pub fn handle_error(operation: &str, message: Option<&str>) -> ReelError {
    let message = message.filter(|m| !m.is_empty()).unwrap_or("Unknown error");
    tracing::error!(operation, message, "hosted backend error");
    ReelError::connector(format!("Error during {operation}: {message}"))
}

#[cfg(test)]
#[path = "../../tests/unit/connect/hosted.rs"]
mod tests;
