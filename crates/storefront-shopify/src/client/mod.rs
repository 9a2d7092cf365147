//! GraphQL client for the Shopify Storefront API.

mod cart;
mod catalog;
mod content;
mod customer;

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_core::AppConfig;

use crate::error::StorefrontError;
use crate::rate_limit::retry_with_backoff;

pub use cart::{CartLineInput, CartLineUpdateInput};
pub use catalog::{ListingQuery, ProductsPage};
pub use customer::{AddressInput, Credentials, NewCustomer};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Client for one store's Storefront API.
///
/// Every operation is a `POST` of `{query, variables}` to the store's
/// `graphql.json` endpoint. Network failures and 429 responses are retried
/// with exponential backoff up to `max_retries` additional attempts; GraphQL
/// level errors are not.
#[derive(Clone)]
pub struct StorefrontClient {
    pub(super) client: Client,
    endpoint: String,
    domain: String,
    access_token: String,
    /// Maximum number of retry attempts after the first failure.
    pub(super) max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    pub(super) backoff_base_secs: u64,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct GraphQlResponse<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

impl StorefrontClient {
    /// Creates a client for `https://{store_domain}/api/{api_version}/graphql.json`.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::InvalidEndpoint`] if the domain does not form a valid URL.
    /// - [`StorefrontError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        store_domain: &str,
        api_version: &str,
        access_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, StorefrontError> {
        let endpoint = endpoint_url(store_domain, api_version)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            domain: store_domain.to_owned(),
            access_token: access_token.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, StorefrontError> {
        Self::new(
            &config.shopify_store_domain,
            &config.shopify_api_version,
            &config.shopify_access_token,
            config.request_timeout_secs,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// Points the client at a different GraphQL endpoint, e.g. a mock server.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute `http(s)` URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, StorefrontError> {
        let url = reqwest::Url::parse(endpoint).map_err(|e| StorefrontError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StorefrontError::InvalidEndpoint {
                endpoint: endpoint.to_owned(),
                reason: format!("unsupported scheme \"{}\"", url.scheme()),
            });
        }
        self.endpoint = url.to_string();
        Ok(self)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one GraphQL operation and returns its `data`.
    ///
    /// A response with errors alongside `data` is accepted (the errors are
    /// logged); a response without `data` is a [`StorefrontError::GraphQl`].
    pub(crate) async fn request<T>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, StorefrontError>
    where
        T: DeserializeOwned,
    {
        let started = Instant::now();
        tracing::debug!(operation, variables = %variables, "storefront request");

        let body = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let payload = GraphQlRequest {
                query,
                variables: &variables,
            };
            let request = self
                .client
                .post(&self.endpoint)
                .header(ACCESS_TOKEN_HEADER, &self.access_token)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(&payload);
            async move {
                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(StorefrontError::RateLimited {
                        domain: self.domain.clone(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(StorefrontError::NotFound {
                        resource: self.endpoint.clone(),
                    });
                }

                if !status.is_success() {
                    return Err(StorefrontError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: self.endpoint.clone(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await;

        let body = match body {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(operation, error = %e, "storefront request failed");
                return Err(e);
            }
        };

        let parsed: GraphQlResponse<T> =
            serde_json::from_str(&body).map_err(|e| StorefrontError::Deserialize {
                context: format!("{operation} response"),
                source: e,
            })?;

        let messages: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
        let elapsed_ms = started.elapsed().as_millis();

        match parsed.data {
            Some(data) => {
                if !messages.is_empty() {
                    tracing::warn!(operation, errors = ?messages, "partial GraphQL response");
                }
                tracing::debug!(operation, elapsed_ms, "storefront request complete");
                Ok(data)
            }
            None => {
                tracing::error!(operation, errors = ?messages, elapsed_ms, "GraphQL response has no data");
                Err(StorefrontError::GraphQl {
                    operation: operation.to_owned(),
                    messages,
                })
            }
        }
    }
}

/// Builds the Storefront API endpoint for a bare store domain.
fn endpoint_url(store_domain: &str, api_version: &str) -> Result<String, StorefrontError> {
    let candidate = format!("https://{store_domain}/api/{api_version}/graphql.json");
    let invalid = |reason: String| StorefrontError::InvalidEndpoint {
        endpoint: candidate.clone(),
        reason,
    };

    if store_domain.trim().is_empty() {
        return Err(invalid("store domain is empty".to_owned()));
    }
    if store_domain.contains('/') {
        return Err(invalid("store domain must not contain a path".to_owned()));
    }
    let url = reqwest::Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
