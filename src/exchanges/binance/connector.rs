use crate::core::{
    config::ExchangeConfig,
    errors::ExchangeError,
    kernel::{Endpoint, Materialized, Params, RestClient, ReturnFormat},
};
use crate::exchanges::binance::market_data::MarketDataClient;
use crate::exchanges::binance::rest::BinanceRestClient;
use crate::exchanges::binance::trading::SpotTradeClient;
use crate::exchanges::binance::wallet::WalletClient;
use serde_json::Value;

/// Binance spot connector.
///
/// Holds only state that is immutable after construction: the resolved base
/// host, the configuration, and the transport. Everything a call produces -
/// parameter bags, raw bodies, materialized values - is call-local and
/// returned to the caller, so one connector is safe to share across tasks.
#[derive(Debug)]
pub struct BinanceConnector<R: RestClient> {
    rest: R,
    base_url: String,
    config: ExchangeConfig,
}

impl<R: RestClient + Clone> BinanceConnector<R> {
    /// Create a connector over an already-built transport and resolved host.
    /// Most callers want [`super::builder::build_connector`] instead.
    pub fn new(rest: R, config: ExchangeConfig, base_url: String) -> Self {
        Self {
            rest,
            base_url,
            config,
        }
    }

    /// The base host this connector resolved at construction.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if authentication is available
    pub fn can_authenticate(&self) -> bool {
        self.config.has_credentials()
    }

    /// Get the current configuration
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Get the REST transport
    pub fn rest(&self) -> &R {
        &self.rest
    }

    /// Market data endpoints (public).
    pub fn market_data(&self) -> MarketDataClient<R> {
        MarketDataClient::new(&self.rest)
    }

    /// Spot trading and account endpoints (signed).
    pub fn trading(&self) -> SpotTradeClient<R> {
        SpotTradeClient::new(&self.rest)
    }

    /// Wallet endpoints.
    pub fn wallet(&self) -> WalletClient<R> {
        WalletClient::new(&self.rest)
    }

    /// Escape hatch: call any endpoint with an explicit [`ReturnFormat`],
    /// for `RawText` and `GenericJson` materialization. Typed materialization
    /// needs an endpoint-specific mapping and lives on the facades.
    pub async fn fetch(
        &self,
        endpoint: &Endpoint,
        params: Params,
        format: ReturnFormat,
    ) -> Result<Materialized, ExchangeError> {
        BinanceRestClient::new(self.rest.clone())
            .fetch::<Value, fn(Value) -> Result<Value, ExchangeError>>(endpoint, params, format, None)
            .await
    }
}
