use async_trait::async_trait;
use binance_spot::core::errors::ExchangeError;
use binance_spot::core::kernel::{Endpoint, Params, RawResponse, RestClient, ReturnFormat};
use binance_spot::exchanges::binance::{
    BinanceConnector, KlineInterval, NewOrderResponse, OrderSide,
};
use binance_spot::ExchangeConfig;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport double: hands back scripted bodies and records every exchange.
#[derive(Clone, Default)]
struct MockRest {
    responses: Arc<Mutex<VecDeque<RawResponse>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockRest {
    fn with_body(status: u16, body: &str) -> Self {
        let mock = Self::default();
        mock.push(status, body);
        mock
    }

    fn push(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(RawResponse {
            status,
            body: body.to_string(),
        });
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn send(&self, endpoint: &Endpoint, params: Params) -> Result<RawResponse, ExchangeError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.path.to_string(), params.to_query_string()));
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(RawResponse {
                status: 200,
                body: "{}".to_string(),
            }))
    }
}

fn connector(rest: MockRest) -> BinanceConnector<MockRest> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    BinanceConnector::new(
        rest,
        ExchangeConfig::read_only(),
        "https://api.binance.com".to_string(),
    )
}

#[tokio::test]
async fn typed_call_round_trips_through_the_pipeline() {
    let rest = MockRest::with_body(200, r#"{"serverTime":1499827319559}"#);
    let connector = connector(rest.clone());

    let time = connector.market_data().server_time().await.unwrap();
    assert_eq!(time.server_time, 1_499_827_319_559);

    let calls = rest.calls();
    assert_eq!(calls, vec![("/api/v3/time".to_string(), String::new())]);
}

#[tokio::test]
async fn query_parameters_reach_the_transport_in_order() {
    let rest = MockRest::with_body(
        200,
        r#"{"lastUpdateId":1,"bids":[["4.00000000","431.00000000"]],"asks":[]}"#,
    );
    let connector = connector(rest.clone());

    connector
        .market_data()
        .order_book("BTCUSD", Some(10))
        .await
        .unwrap();

    let calls = rest.calls();
    assert_eq!(calls[0].0, "/api/v3/depth");
    assert_eq!(calls[0].1, "symbol=BTCUSD&limit=10");
}

#[tokio::test]
async fn symbol_lists_travel_in_json_array_form() {
    let rest = MockRest::with_body(
        200,
        r#"{"timezone":"UTC","serverTime":1,"rateLimits":[],"symbols":[]}"#,
    );
    let connector = connector(rest.clone());

    connector
        .market_data()
        .exchange_info_for_symbols(&["BTCUSDT", "BNBUSDT"])
        .await
        .unwrap();

    assert_eq!(
        rest.calls()[0].1,
        "symbols=%5B%22BTCUSDT%22%2C%22BNBUSDT%22%5D"
    );
}

#[tokio::test]
async fn klines_map_through_the_field_extractor() {
    let rest = MockRest::with_body(
        200,
        r#"[[1499040000000,"0.01634790","0.80000000","0.01575800","0.01577100","148976.11427815",1499644799999,"2434.19055334",308,"1756.87402397","28.46694368","0"]]"#,
    );
    let connector = connector(rest.clone());

    let klines = connector
        .market_data()
        .klines("ETHBTC", KlineInterval::Days1, Some(1), None, None)
        .await
        .unwrap();

    assert_eq!(klines.len(), 1);
    assert_eq!(klines[0].trades, 308);
    assert_eq!(klines[0].close.to_string(), "0.01577100");
    assert_eq!(rest.calls()[0].1, "symbol=ETHBTC&interval=1d&limit=1");
}

#[tokio::test]
async fn upstream_error_payload_surfaces_with_its_own_code() {
    let rest = MockRest::with_body(400, r#"{"code":-1121,"msg":"Invalid symbol."}"#);
    let connector = connector(rest);

    let err = connector
        .market_data()
        .price_ticker("NOPE")
        .await
        .unwrap_err();

    match err {
        ExchangeError::ApiError {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, -1121);
            assert_eq!(message, "Invalid symbol.");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn unparseable_success_body_is_a_deserialization_error() {
    let rest = MockRest::with_body(200, "<html>not json</html>");
    let connector = connector(rest);

    let err = connector.market_data().server_time().await.unwrap_err();
    assert!(matches!(err, ExchangeError::DeserializationError(_)));
}

#[tokio::test]
async fn raw_text_escape_hatch_returns_body_verbatim() {
    let body = "<html>not json</html>";
    let rest = MockRest::with_body(200, body);
    let connector = connector(rest);

    let endpoint = Endpoint::get(
        "/api/v3/ping",
        binance_spot::core::kernel::SecurityType::None,
    );
    let materialized = connector
        .fetch(&endpoint, Params::new(), ReturnFormat::RawText)
        .await
        .unwrap();
    assert_eq!(materialized.into_raw().unwrap(), body);
}

#[tokio::test]
async fn generic_json_escape_hatch_yields_a_tree() {
    let rest = MockRest::with_body(200, r#"{"mins":5,"price":"9.35751834"}"#);
    let connector = connector(rest);

    let endpoint = Endpoint::get(
        "/api/v3/avgPrice",
        binance_spot::core::kernel::SecurityType::None,
    );
    let value = connector
        .fetch(
            &endpoint,
            Params::new().with("symbol", "BNBUSDT"),
            ReturnFormat::GenericJson,
        )
        .await
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(value["mins"], 5);
}

#[tokio::test]
async fn colliding_extra_parameter_never_reaches_the_network() {
    let rest = MockRest::default();
    let connector = connector(rest.clone());

    let err = connector
        .trading()
        .all_orders("BTCUSD", Params::new().with("symbol", "ETHUSD"))
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::InvalidParameters(_)));
    assert!(rest.calls().is_empty());
}

#[tokio::test]
async fn order_placement_parses_the_requested_response_shape() {
    let rest = MockRest::with_body(
        200,
        r#"{"symbol":"BTCUSDT","orderId":28,"orderListId":-1,"clientOrderId":"6gCrw2kRUAF9CvJDGP16IP","transactTime":1507725176595}"#,
    );
    let connector = connector(rest.clone());

    let order = binance_spot::exchanges::binance::NewOrder::market(
        "BTCUSDT",
        OrderSide::Sell,
        Decimal::from(1),
    );
    let response = connector.trading().new_order(&order).await.unwrap();
    assert!(matches!(response, NewOrderResponse::Ack(_)));
    assert_eq!(
        rest.calls()[0].1,
        "symbol=BTCUSDT&side=SELL&type=MARKET&quantity=1"
    );
}
