use crate::core::errors::ExchangeError;
use crate::core::kernel::params::Params;
use crate::core::kernel::response::RawResponse;
use crate::core::kernel::signer::RequestSigner;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{instrument, trace};

/// Authentication requirement of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityType {
    /// Public endpoint: no key header, no signature.
    None,
    /// API key header only, no signature.
    ApiKey,
    /// API key header plus HMAC signature over the parameter string.
    Signed,
}

/// HTTP request methods used by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    /// GET and DELETE carry parameters in the query string; POST and PUT
    /// carry the identical string as an urlencoded body.
    fn params_in_query(self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

/// A REST endpoint descriptor: path, verb, and auth requirement.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: HttpMethod,
    pub security: SecurityType,
}

impl Endpoint {
    pub const fn get(path: &'static str, security: SecurityType) -> Self {
        Self {
            path,
            method: HttpMethod::Get,
            security,
        }
    }

    pub const fn post(path: &'static str, security: SecurityType) -> Self {
        Self {
            path,
            method: HttpMethod::Post,
            security,
        }
    }

    pub const fn put(path: &'static str, security: SecurityType) -> Self {
        Self {
            path,
            method: HttpMethod::Put,
            security,
        }
    }

    pub const fn delete(path: &'static str, security: SecurityType) -> Self {
        Self {
            path,
            method: HttpMethod::Delete,
            security,
        }
    }
}

/// REST transport interface.
///
/// Implementations perform one HTTP exchange and hand back the raw body on
/// any status; they never interpret status codes or body contents. That
/// classification belongs to the response layer, so transport doubles (mocks)
/// stay trivial.
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn send(&self, endpoint: &Endpoint, params: Params) -> Result<RawResponse, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Resolved base host for the API
    pub base_url: String,
    /// Venue name for logging and tracing
    pub venue: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String, venue: String) -> Self {
        Self {
            base_url,
            venue,
            timeout_seconds: 30,
            user_agent: "binance-spot/0.1".to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    api_key: Option<String>,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            api_key: None,
            signer: None,
        }
    }

    /// Set the API key attached to `ApiKey` and `Signed` endpoints.
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the signer for `Signed` endpoints.
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            api_key: self.api_key,
            signer: self.signer,
        })
    }
}

/// Implementation of [`RestClient`] using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    api_key: Option<String>,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_api_key", &self.api_key.is_some())
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    /// Get the current timestamp in milliseconds
    fn get_timestamp() -> Result<u64, ExchangeError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|e| ExchangeError::NetworkError(format!("Failed to get timestamp: {}", e)))
    }

    fn api_key(&self) -> Result<&str, ExchangeError> {
        self.api_key.as_deref().ok_or_else(|| {
            ExchangeError::AuthError("endpoint requires an API key but none is configured".into())
        })
    }

    /// Produce the final wire parameter string for the endpoint's auth level.
    fn wire_params(&self, endpoint: &Endpoint, params: &Params) -> Result<String, ExchangeError> {
        let assembled = params.to_query_string();
        match endpoint.security {
            SecurityType::None | SecurityType::ApiKey => Ok(assembled),
            SecurityType::Signed => {
                let signer = self.signer.as_ref().ok_or_else(|| {
                    ExchangeError::AuthError(
                        "signed endpoint requires a secret key but none is configured".into(),
                    )
                })?;
                signer.sign(&assembled, Self::get_timestamp()?)
            }
        }
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(
        skip(self, params),
        fields(venue = %self.config.venue, method = endpoint.method.as_str(), path = %endpoint.path)
    )]
    async fn send(&self, endpoint: &Endpoint, params: Params) -> Result<RawResponse, ExchangeError> {
        let wire = self.wire_params(endpoint, &params)?;

        let url = if endpoint.method.params_in_query() && !wire.is_empty() {
            format!("{}{}?{}", self.config.base_url, endpoint.path, wire)
        } else {
            format!("{}{}", self.config.base_url, endpoint.path)
        };

        let mut request = self.client.request(endpoint.method.as_reqwest(), &url);

        if !matches!(endpoint.security, SecurityType::None) {
            request = request.header("X-MBX-APIKEY", self.api_key()?);
        }

        if !endpoint.method.params_in_query() && !wire.is_empty() {
            request = request
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(wire);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ExchangeError::NetworkError(format!("Request timed out: {}", e))
            } else {
                ExchangeError::NetworkError(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!(status, "response body: {}", body);

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::signer::HmacSigner;

    fn rest(api_key: Option<&str>, signer: bool) -> ReqwestRest {
        let config = RestClientConfig::new(
            "https://api.binance.com".to_string(),
            "binance".to_string(),
        );
        let mut builder = RestClientBuilder::new(config);
        if let Some(key) = api_key {
            builder = builder.with_api_key(key.to_string());
        }
        if signer {
            builder = builder.with_signer(Arc::new(HmacSigner::new("secret".to_string())));
        }
        builder.build().unwrap()
    }

    #[test]
    fn public_params_pass_through_unsigned() {
        let endpoint = Endpoint::get("/api/v3/depth", SecurityType::None);
        let params = Params::new().with("symbol", "BTCUSD");
        let wire = rest(None, false).wire_params(&endpoint, &params).unwrap();
        assert_eq!(wire, "symbol=BTCUSD");
    }

    #[test]
    fn signed_endpoint_without_secret_fails_before_network() {
        let endpoint = Endpoint::post("/api/v3/order", SecurityType::Signed);
        let err = rest(Some("key"), false)
            .wire_params(&endpoint, &Params::new())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::AuthError(_)));
    }

    #[test]
    fn signed_params_end_with_signature() {
        let endpoint = Endpoint::get("/api/v3/account", SecurityType::Signed);
        let wire = rest(Some("key"), true)
            .wire_params(&endpoint, &Params::new())
            .unwrap();
        assert!(wire.contains("timestamp="));
        assert!(wire.rsplit('&').next().unwrap().starts_with("signature="));
    }

    #[test]
    fn missing_api_key_is_an_auth_error() {
        let err = rest(None, false).api_key().unwrap_err();
        assert!(matches!(err, ExchangeError::AuthError(_)));
    }
}
