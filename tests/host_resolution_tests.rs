use async_trait::async_trait;
use binance_spot::core::errors::ExchangeError;
use binance_spot::core::kernel::{ConnectivityProbe, BASE_HOST_CANDIDATES, TESTNET_HOST};
use binance_spot::exchanges::binance::build_connector_with_probe;
use binance_spot::ExchangeConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Probe double answering from a fixed liveness map, counting invocations.
struct CountingProbe {
    alive: Vec<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl CountingProbe {
    fn new(alive: Vec<&'static str>) -> Self {
        Self {
            alive,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectivityProbe for CountingProbe {
    async fn ping(&self, host: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.alive.contains(&host)
    }
}

#[tokio::test]
async fn construction_fails_with_maintenance_when_every_host_is_down() {
    let probe = CountingProbe::new(vec![]);
    let err = build_connector_with_probe(ExchangeConfig::read_only(), &probe)
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::Maintenance));
    // Every candidate was tried exactly once, and nothing after the probes.
    assert_eq!(probe.call_count(), BASE_HOST_CANDIDATES.len());
}

#[tokio::test]
async fn explicit_base_url_is_used_without_probing() {
    let probe = CountingProbe::new(vec![]);
    let config = ExchangeConfig::read_only().base_url("https://api4.binance.com".to_string());

    let connector = build_connector_with_probe(config, &probe).await.unwrap();
    assert_eq!(connector.base_url(), "https://api4.binance.com");
    assert_eq!(probe.call_count(), 0);
}

#[tokio::test]
async fn testnet_resolves_to_the_testnet_host_without_probing() {
    let probe = CountingProbe::new(vec![]);
    let config = ExchangeConfig::read_only().testnet(true);

    let connector = build_connector_with_probe(config, &probe).await.unwrap();
    assert_eq!(connector.base_url(), TESTNET_HOST);
    assert_eq!(probe.call_count(), 0);
}

#[tokio::test]
async fn first_live_candidate_is_committed_to() {
    let probe = CountingProbe::new(vec![BASE_HOST_CANDIDATES[1]]);
    let connector = build_connector_with_probe(ExchangeConfig::read_only(), &probe)
        .await
        .unwrap();

    assert_eq!(connector.base_url(), BASE_HOST_CANDIDATES[1]);
    assert_eq!(probe.call_count(), 2);
}
