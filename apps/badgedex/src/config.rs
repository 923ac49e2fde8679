//! Runtime configuration.
//!
//! Values come from CLI flags with `BADGEDEX_*` environment fallbacks (see
//! [`crate::cli::Cli`]); this module only holds and validates them.

use badgedex_github::{DEFAULT_API_BASE, GithubClient};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default preference database file, relative to the working directory.
pub const DEFAULT_STORE: &str = "badgedex.redb";

/// Default HTTP listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of profile lookups the HTTP API forwards per minute.
pub const DEFAULT_LOOKUPS_PER_MINUTE: u32 = 30;

/// Everything the CLI and server need to run.
#[derive(Clone)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub api_base: String,
    pub timeout: Duration,
    pub bind: String,
    /// Bearer key required on mutating HTTP routes, if set.
    pub api_key: Option<String>,
    pub lookups_per_minute: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind: DEFAULT_BIND.to_string(),
            api_key: None,
            lookups_per_minute: DEFAULT_LOOKUPS_PER_MINUTE,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("store_path", &self.store_path)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("bind", &self.bind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("lookups_per_minute", &self.lookups_per_minute)
            .finish()
    }
}

impl AppConfig {
    /// Build the GitHub client for `api_base` and `timeout`.
    pub fn github_client(&self) -> Result<GithubClient, badgedex_github::Error> {
        GithubClient::new(&self.api_base, self.timeout)
    }

    /// The API key, ignoring an empty value.
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("hunter2".to_string()),
            ..AppConfig::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn empty_api_key_disables_auth() {
        let config = AppConfig {
            api_key: Some(String::new()),
            ..AppConfig::default()
        };
        assert_eq!(config.effective_api_key(), None);
    }

    #[test]
    fn defaults_point_at_public_github() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "https://api.github.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.github_client().is_ok());
    }
}
