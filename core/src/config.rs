//! Dispatcher configuration loaded from environment variables.

use url::Url;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "DISPATCH_BASE_URL";
pub const USER_ID_VAR: &str = "DISPATCH_USER_ID";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Origin relative endpoints are resolved against, without a trailing
    /// slash.
    pub base_url: String,
    /// Sent as the `userId` parameter on every request when set.
    pub user_id: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: None,
        }
    }
}

impl DispatchConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            user_id: None,
        })
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = read(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            user_id: read(USER_ID_VAR),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DispatchConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DispatchConfig::default());
    }

    #[test]
    fn reads_base_url_and_user_id() {
        let config = DispatchConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://localhost:9003/"),
            (USER_ID_VAR, "bill"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9003");
        assert_eq!(config.user_id.as_deref(), Some("bill"));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = DispatchConfig::from_lookup(lookup(&[(BASE_URL_VAR, "  "), (USER_ID_VAR, "")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_id.is_none());
    }

    #[test]
    fn rejects_unparsable_url() {
        let err = DispatchConfig::new("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = DispatchConfig::new("ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme { ref scheme } if scheme == "ftp"));
    }
}
