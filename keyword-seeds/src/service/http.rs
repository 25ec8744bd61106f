//! JSON over HTTP client for the targeting idea service.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use std::time::Duration;

use super::TargetingIdeaService;
use crate::config::ServiceConfig;
use crate::errors::{KeywordSeedError, ServiceError};
use crate::model::{ClientCustomerId, TargetingIdeaPage, TargetingIdeaSelector};

const CLIENT_CUSTOMER_ID_HEADER: &str = "client-customer-id";
const DEVELOPER_TOKEN_HEADER: &str = "developer-token";
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY_CHARS: usize = 500;

/// HTTP implementation of [`TargetingIdeaService`].
#[derive(Debug, Clone)]
pub struct HttpTargetingIdeaService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTargetingIdeaService {
    /// Creates a client scoped to the given account.
    ///
    /// Invalid headers and client build failures are reported as
    /// [`KeywordSeedError::Config`].
    pub fn new(
        config: &ServiceConfig,
        account: ClientCustomerId,
    ) -> Result<Self, KeywordSeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CLIENT_CUSTOMER_ID_HEADER,
            header_value(&account.to_string())?,
        );
        if let Some(ref token) = config.developer_token {
            headers.insert(DEVELOPER_TOKEN_HEADER, header_value(token)?);
        }
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| KeywordSeedError::Config(format!("invalid header name '{key}': {e}")))?;
            headers.insert(name, header_value(value)?);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| KeywordSeedError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Endpoint the selectors are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn header_value(value: &str) -> Result<HeaderValue, KeywordSeedError> {
    HeaderValue::from_str(value)
        .map_err(|e| KeywordSeedError::Config(format!("invalid header value: {e}")))
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Maps a non-success HTTP status to a service error.
#[must_use]
pub fn classify_status(status: u16, body: &str, retry_after: Option<Duration>) -> ServiceError {
    let message: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
    let message = if message.is_empty() {
        format!("HTTP {status}")
    } else {
        message
    };

    match status {
        429 => ServiceError::rate_exceeded(retry_after.unwrap_or(DEFAULT_RETRY_AFTER), message),
        _ => ServiceError::api_with_code(status.to_string(), message),
    }
}

#[async_trait]
impl TargetingIdeaService for HttpTargetingIdeaService {
    async fn get(&self, selector: &TargetingIdeaSelector) -> Result<TargetingIdeaPage, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(selector)
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                status = status.as_u16(),
                endpoint = %self.endpoint,
                "Targeting idea request rejected"
            );
            return Err(classify_status(status.as_u16(), &body, retry_after));
        }

        response
            .json::<TargetingIdeaPage>()
            .await
            .map_err(|e| ServiceError::transport(format!("failed to decode page: {e}")))
    }
}
