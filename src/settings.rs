//! Credentials from the environment.
//!
//! ```bash
//! export GOOGLE_CLIENT_ID="1234-abc.apps.googleusercontent.com"
//! export GOOGLE_CLIENT_SECRET="your-client-secret"
//! # optional, skips the interactive consent step
//! export GOOGLE_REFRESH_TOKEN="1//0g..."
//! ```

use crate::{GPhotosError, Result};

pub const ENV_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const ENV_REFRESH_TOKEN: &str = "GOOGLE_REFRESH_TOKEN";

/// Client credentials plus an optional refresh token from an earlier consent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: Option<String>,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; values are trimmed and blank ones count as unset
    ///
    /// # Errors
    ///
    /// Returns [`GPhotosError::InvalidConfig`] when the client ID or secret is missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &str| {
            read(key).ok_or_else(|| {
                GPhotosError::InvalidConfig(format!("environment variable {} is not set", key))
            })
        };

        Ok(Self {
            client_id: required(ENV_CLIENT_ID)?,
            client_secret: required(ENV_CLIENT_SECRET)?,
            refresh_token: read(ENV_REFRESH_TOKEN),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_reads_and_trims() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_CLIENT_ID, " id.apps.googleusercontent.com\n"),
            (ENV_CLIENT_SECRET, "secret "),
            (ENV_REFRESH_TOKEN, " 1//refresh "),
        ]))
        .unwrap();
        assert_eq!(settings.client_id, "id.apps.googleusercontent.com");
        assert_eq!(settings.client_secret, "secret");
        assert_eq!(settings.refresh_token.as_deref(), Some("1//refresh"));
    }

    #[test]
    fn test_blank_refresh_token_is_absent() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_REFRESH_TOKEN, "   "),
        ]))
        .unwrap();
        assert_eq!(settings.refresh_token, None);
    }

    #[test]
    fn test_missing_secret() {
        let err = Settings::from_lookup(lookup(&[(ENV_CLIENT_ID, "id")])).unwrap_err();
        assert!(
            matches!(err, GPhotosError::InvalidConfig(msg) if msg.contains(ENV_CLIENT_SECRET))
        );
    }
}
