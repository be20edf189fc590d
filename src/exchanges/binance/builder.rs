use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    resolve_host, ConnectivityProbe, HmacSigner, ReqwestRest, RestClientBuilder, RestClientConfig,
    RestProbe, TESTNET_HOST,
};
use crate::exchanges::binance::connector::BinanceConnector;
use std::sync::Arc;
use std::time::Duration;

/// Create a connector, resolving the base host first.
///
/// With an explicit `base_url` (or `testnet`) in the configuration the host
/// is taken as-is and nothing is probed. Otherwise the candidate hosts are
/// probed in priority order, and if none answers the construction fails with
/// [`ExchangeError::Maintenance`] - a connector is never built against an
/// exchange that is down. The resolved host is fixed for the connector's
/// lifetime; build a new connector to re-resolve.
pub async fn build_connector(
    config: ExchangeConfig,
) -> Result<BinanceConnector<ReqwestRest>, ExchangeError> {
    let probe = RestProbe::new(Duration::from_secs(config.timeout_secs))?;
    build_connector_with_probe(config, &probe).await
}

/// [`build_connector`] with an injected probe; the seam the maintenance
/// tests drive.
pub async fn build_connector_with_probe(
    config: ExchangeConfig,
    probe: &dyn ConnectivityProbe,
) -> Result<BinanceConnector<ReqwestRest>, ExchangeError> {
    let explicit = if config.testnet {
        Some(TESTNET_HOST.to_string())
    } else {
        config.base_url.clone()
    };

    let base_url = resolve_host(probe, explicit.as_deref()).await?;
    build_connector_with_host(config, base_url)
}

/// Create a connector against a known host, skipping resolution entirely.
pub fn build_connector_with_host(
    config: ExchangeConfig,
    base_url: String,
) -> Result<BinanceConnector<ReqwestRest>, ExchangeError> {
    let rest_config = RestClientConfig::new(base_url.clone(), "binance".to_string())
        .with_timeout(config.timeout_secs);

    let mut rest_builder = RestClientBuilder::new(rest_config);

    if !config.api_key().is_empty() {
        rest_builder = rest_builder.with_api_key(config.api_key().to_string());
    }

    // Signing is available only with a secret; API-key-only configurations
    // can still reach `ApiKey` endpoints.
    if !config.secret_key().is_empty() {
        let mut signer = HmacSigner::new(config.secret_key().to_string());
        if let Some(recv_window) = config.recv_window {
            signer = signer.with_recv_window(recv_window);
        }
        rest_builder = rest_builder.with_signer(Arc::new(signer));
    }

    let rest = rest_builder.build()?;

    Ok(BinanceConnector::new(rest, config, base_url))
}
