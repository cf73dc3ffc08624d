//! Best-effort city detection from public-IP geolocation.
//! Providers are tried in order; the first one that names a city wins.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::LocationError;
use crate::retry::{with_retry, RetryConfig};

pub const DEFAULT_PROVIDERS: &[&str] = &["https://ipinfo.io/json", "https://ip.cn/json"];
pub const DEFAULT_CITY: &str = "北京";

#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub providers: Vec<String>,
    pub attempts_per_provider: u32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay before the second attempt against a provider
    pub retry_delay: Duration,
    /// Returned by `resolve` when every provider fails
    pub default_city: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            providers: DEFAULT_PROVIDERS.iter().map(|p| p.to_string()).collect(),
            attempts_per_provider: 3,
            timeout: Duration::from_secs(8),
            retry_delay: Duration::from_millis(500),
            default_city: DEFAULT_CITY.to_string(),
        }
    }
}

/// City chosen at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedCity {
    pub name: String,
    /// False when the configured default was used
    pub detected: bool,
}

/// Both supported providers report the city under `city`
#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    city: Option<String>,
}

#[derive(Debug)]
enum ProviderError {
    Request(reqwest::Error),
    Status(reqwest::StatusCode),
    Body(reqwest::Error),
    NoCity,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request(e) => write!(f, "request failed: {}", e),
            Self::Status(s) => write!(f, "HTTP {}", s),
            Self::Body(e) => write!(f, "unreadable body: {}", e),
            Self::NoCity => write!(f, "response has no city"),
        }
    }
}

pub struct IpLocator {
    client: Client,
    config: LocatorConfig,
}

impl IpLocator {
    pub fn new(config: LocatorConfig) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("skyview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Ask each provider in turn for the caller's city.
    pub async fn lookup_city(&self) -> Result<String, LocationError> {
        let retry = RetryConfig::new(
            self.config.attempts_per_provider,
            self.config.retry_delay,
            self.config.retry_delay.saturating_mul(4),
        );

        for provider in &self.config.providers {
            match self.query(provider, &retry).await {
                Ok(city) => {
                    tracing::info!("Detected city {} via {}", city, provider);
                    return Ok(city);
                }
                Err(e) => tracing::warn!("IP geolocation via {} failed: {}", provider, e),
            }
        }

        Err(LocationError::AllProvidersFailed {
            providers: self.config.providers.len(),
        })
    }

    /// Detected city, or the configured default when detection fails.
    pub async fn resolve(&self) -> LocatedCity {
        match self.lookup_city().await {
            Ok(name) => LocatedCity {
                name,
                detected: true,
            },
            Err(e) => {
                tracing::warn!("{}; using default city {}", e, self.config.default_city);
                LocatedCity {
                    name: self.config.default_city.clone(),
                    detected: false,
                }
            }
        }
    }

    async fn query(&self, provider: &str, retry: &RetryConfig) -> Result<String, ProviderError> {
        let response = with_retry(retry, || self.client.get(provider).send())
            .await
            .map_err(ProviderError::Request)?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let body: IpLookupResponse = response.json().await.map_err(ProviderError::Body)?;
        body.city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::NoCity)
    }
}
