//! Remote endpoint credentials.
//!
//! Values come from the environment (`MASTODON_*`), never from process-wide
//! state, and are validated before any ledger or network activity.

use fedipost_logging::fedipost_warn;
use thiserror::Error;
use url::Url;

pub const ENV_BASE_URL: &str = "MASTODON_BASE_URL";
pub const ENV_OAUTH_TOKEN: &str = "MASTODON_OAUTH_TOKEN";
/// Deprecated password authentication.
pub const ENV_USERNAME: &str = "MASTODON_USERNAME";
/// Deprecated password authentication.
pub const ENV_PASSWORD: &str = "MASTODON_PASSWORD";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is missing; set the instance URL and OAuth token")]
    Missing(&'static str),
    #[error("{name} is not a valid URL: {message}")]
    InvalidUrl { name: &'static str, message: String },
    #[error("invalid settings: {0}")]
    Settings(String),
}

/// Unvalidated credentials as found in the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Credentials that passed validation.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub base_url: Url,
    pub access_token: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: lookup(ENV_BASE_URL),
            access_token: lookup(ENV_OAUTH_TOKEN),
            username: lookup(ENV_USERNAME),
            password: lookup(ENV_PASSWORD),
        }
    }

    /// Whether deprecated password-authentication fields are set.
    pub fn uses_legacy_password_auth(&self) -> bool {
        non_blank(&self.username).is_some() || non_blank(&self.password).is_some()
    }

    pub fn validate(&self) -> Result<ApiCredentials, ConfigError> {
        if self.uses_legacy_password_auth() {
            fedipost_warn!(
                "{}/{} are set: password authentication is deprecated and ignored, use {} instead",
                ENV_USERNAME,
                ENV_PASSWORD,
                ENV_OAUTH_TOKEN
            );
        }

        let base_url = non_blank(&self.base_url).ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let access_token =
            non_blank(&self.access_token).ok_or(ConfigError::Missing(ENV_OAUTH_TOKEN))?;
        let base_url = Url::parse(base_url).map_err(|err| ConfigError::InvalidUrl {
            name: ENV_BASE_URL,
            message: err.to_string(),
        })?;

        Ok(ApiCredentials {
            base_url,
            access_token: access_token.to_string(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
