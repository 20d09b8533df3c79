use std::time::Duration;

use fedipost_core::Visibility;
use fedipost_logging::fedipost_debug;
use serde::Serialize;
use serde_json::Value;

use crate::credentials::ApiCredentials;
use crate::{StatusId, SubmitError, SubmitFailureKind};

#[derive(Debug, Clone)]
pub struct ChannelSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Where composed announcements go.
#[async_trait::async_trait]
pub trait Outbound: Send + Sync {
    async fn submit(&self, message: &str, visibility: Visibility) -> Result<StatusId, SubmitError>;
}

#[derive(Debug, Serialize)]
struct StatusRequest<'a> {
    status: &'a str,
    visibility: &'static str,
}

/// Posts statuses through the Mastodon REST API with an OAuth bearer token.
#[derive(Debug, Clone)]
pub struct MastodonChannel {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl MastodonChannel {
    pub fn new(credentials: ApiCredentials, settings: ChannelSettings) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SubmitError::new(SubmitFailureKind::Network, err.to_string()))?;
        let endpoint = format!(
            "{}/api/v1/statuses",
            credentials.base_url.as_str().trim_end_matches('/')
        );
        Ok(Self {
            client,
            endpoint,
            access_token: credentials.access_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Outbound for MastodonChannel {
    async fn submit(&self, message: &str, visibility: Visibility) -> Result<StatusId, SubmitError> {
        let endpoint = reqwest::Url::parse(&self.endpoint)
            .map_err(|err| SubmitError::new(SubmitFailureKind::InvalidUrl, err.to_string()))?;
        fedipost_debug!(
            "POST {} visibility={} chars={}",
            endpoint,
            visibility,
            message.chars().count()
        );

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.access_token)
            .json(&StatusRequest {
                status: message,
                visibility: visibility.as_str(),
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(SubmitError::new(
                SubmitFailureKind::HttpStatus(status.as_u16()),
                error_message(&body).unwrap_or_else(|| status.to_string()),
            ));
        }

        status_id(&body).ok_or_else(|| {
            SubmitError::new(SubmitFailureKind::InvalidResponse, "response carries no status id")
        })
    }
}

/// The `id` of a created status; the API sends it as a string.
fn status_id(body: &str) -> Option<StatusId> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("id")? {
        Value::String(id) => Some(StatusId(id.clone())),
        Value::Number(id) => Some(StatusId(id.to_string())),
        _ => None,
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(ToOwned::to_owned)
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(SubmitFailureKind::Timeout, err.to_string());
    }
    SubmitError::new(SubmitFailureKind::Network, err.to_string())
}
