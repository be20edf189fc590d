use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Mirrored base hosts, in probe priority order.
pub const BASE_HOST_CANDIDATES: [&str; 6] = [
    "https://api.binance.com",
    "https://api-gcp.binance.com",
    "https://api1.binance.com",
    "https://api2.binance.com",
    "https://api3.binance.com",
    "https://api4.binance.com",
];

/// Spot testnet host.
pub const TESTNET_HOST: &str = "https://testnet.binance.vision";

/// Liveness probe against a single base host.
///
/// A trait seam so host resolution can be driven by a mock in tests; the
/// production implementation issues the lightweight `/api/v3/ping` call.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Whether `host` acknowledged the connectivity call.
    async fn ping(&self, host: &str) -> bool;
}

/// reqwest-backed probe.
pub struct RestProbe {
    client: reqwest::Client,
}

impl RestProbe {
    pub fn new(timeout: Duration) -> Result<Self, ExchangeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("Failed to build probe client: {}", e))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ConnectivityProbe for RestProbe {
    async fn ping(&self, host: &str) -> bool {
        match self.client.get(format!("{}/api/v3/ping", host)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Select the base host for a connector instance.
///
/// An explicit host resolves immediately, with no probe traffic. Otherwise
/// candidates are probed in priority order and the first live one wins;
/// candidates after it are not contacted. When every candidate fails the
/// probe the exchange itself is down and the result is
/// [`ExchangeError::Maintenance`], distinct from an ordinary network failure.
///
/// Resolution runs once per connector, at construction; the resolved host is
/// immutable afterwards. Re-resolving requires constructing a new connector.
pub async fn resolve_host(
    probe: &dyn ConnectivityProbe,
    explicit: Option<&str>,
) -> Result<String, ExchangeError> {
    if let Some(host) = explicit {
        return Ok(host.trim_end_matches('/').to_string());
    }

    for host in BASE_HOST_CANDIDATES {
        if probe.ping(host).await {
            debug!(host, "resolved base host");
            return Ok(host.to_string());
        }
        warn!(host, "base host failed connectivity probe");
    }

    Err(ExchangeError::Maintenance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Probe that answers `true` starting at the nth candidate and counts calls.
    struct ScriptedProbe {
        alive_from: usize,
        calls: AtomicUsize,
    }

    impl ScriptedProbe {
        fn new(alive_from: usize) -> Self {
            Self {
                alive_from,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConnectivityProbe for ScriptedProbe {
        async fn ping(&self, _host: &str) -> bool {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            n >= self.alive_from
        }
    }

    #[tokio::test]
    async fn explicit_host_skips_probing() {
        let probe = ScriptedProbe::new(0);
        let host = resolve_host(&probe, Some("https://api4.binance.com/"))
            .await
            .unwrap();
        assert_eq!(host, "https://api4.binance.com");
        assert_eq!(probe.call_count(), 0);
    }

    #[tokio::test]
    async fn first_live_candidate_wins() {
        let probe = ScriptedProbe::new(0);
        let host = resolve_host(&probe, None).await.unwrap();
        assert_eq!(host, BASE_HOST_CANDIDATES[0]);
        assert_eq!(probe.call_count(), 1);
    }

    #[tokio::test]
    async fn probing_stops_at_first_success() {
        let probe = ScriptedProbe::new(2);
        let host = resolve_host(&probe, None).await.unwrap();
        assert_eq!(host, BASE_HOST_CANDIDATES[2]);
        assert_eq!(probe.call_count(), 3);
    }

    #[tokio::test]
    async fn all_candidates_down_is_maintenance_not_network() {
        let probe = ScriptedProbe::new(usize::MAX);
        let err = resolve_host(&probe, None).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Maintenance));
        assert_eq!(probe.call_count(), BASE_HOST_CANDIDATES.len());
    }
}
