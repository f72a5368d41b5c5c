use std::env;
use std::fmt;
use std::time::Duration;
use tracing::warn;
use url::Url;

pub const REMOTE_URL_ENV: &str = "CALENDAR_REMOTE_URL";
pub const REMOTE_KEY_ENV: &str = "CALENDAR_REMOTE_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Endpoint and access key of the remote settlement store
#[derive(Clone)]
pub struct RemoteConfig {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

// The access key never reaches the logs
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RemoteConfig {
    /// Read the remote endpoint from the environment.
    ///
    /// Returns `None` when the remote store is not configured, which switches
    /// the application to local-only mode.
    pub fn from_env() -> Option<Self> {
        Self::from_parts(env::var(REMOTE_URL_ENV).ok(), env::var(REMOTE_KEY_ENV).ok())
    }

    pub fn from_parts(url: Option<String>, api_key: Option<String>) -> Option<Self> {
        let url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        let api_key = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());

        let (url, api_key) = match (url, api_key) {
            (Some(url), Some(api_key)) => (url, api_key),
            (None, None) => return None,
            _ => {
                warn!(
                    "⚠️ Only one of {} and {} is set, settlements are disabled",
                    REMOTE_URL_ENV, REMOTE_KEY_ENV
                );
                return None;
            }
        };

        let mut base_url = match Url::parse(&url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("⚠️ {} is not a valid URL ({}), settlements are disabled", REMOTE_URL_ENV, e);
                return None;
            }
        };
        if !matches!(base_url.scheme(), "http" | "https") {
            warn!(
                "⚠️ {} must use http or https, got '{}'. Settlements are disabled",
                REMOTE_URL_ENV,
                base_url.scheme()
            );
            return None;
        }

        // Url::join replaces the last path segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Some(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}
