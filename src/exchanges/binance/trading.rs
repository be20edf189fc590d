use crate::core::errors::ExchangeError;
use crate::core::kernel::{Endpoint, Params, RestClient, SecurityType};
use crate::exchanges::binance::rest::BinanceRestClient;
use crate::exchanges::binance::types::{
    Account, CanceledOrder, MyTrade, NewOrderResponse, Order, OrderSide, OrderType, TimeInForce,
};
use rust_decimal::Decimal;
use tracing::instrument;

const ORDER: Endpoint = Endpoint::post("/api/v3/order", SecurityType::Signed);
const ORDER_TEST: Endpoint = Endpoint::post("/api/v3/order/test", SecurityType::Signed);
const ORDER_QUERY: Endpoint = Endpoint::get("/api/v3/order", SecurityType::Signed);
const ORDER_CANCEL: Endpoint = Endpoint::delete("/api/v3/order", SecurityType::Signed);
const OPEN_ORDERS: Endpoint = Endpoint::get("/api/v3/openOrders", SecurityType::Signed);
const OPEN_ORDERS_CANCEL: Endpoint = Endpoint::delete("/api/v3/openOrders", SecurityType::Signed);
const ALL_ORDERS: Endpoint = Endpoint::get("/api/v3/allOrders", SecurityType::Signed);
const ACCOUNT: Endpoint = Endpoint::get("/api/v3/account", SecurityType::Signed);
const MY_TRADES: Endpoint = Endpoint::get("/api/v3/myTrades", SecurityType::Signed);

/// Response shape requested at order placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewOrderRespType {
    Ack,
    Result,
    Full,
}

impl NewOrderRespType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ack => "ACK",
            Self::Result => "RESULT",
            Self::Full => "FULL",
        }
    }
}

/// An order to be placed.
///
/// Mandatory fields are positional on the constructors; everything else is an
/// optional field or goes in the `extra` bag, which is appended after the
/// mandatory parameters and rejected on key collision.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Option<Decimal>,
    pub quote_order_qty: Option<Decimal>,
    pub price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub new_client_order_id: Option<String>,
    pub stop_price: Option<Decimal>,
    pub iceberg_qty: Option<Decimal>,
    pub new_order_resp_type: Option<NewOrderRespType>,
    pub extra: Params,
}

impl NewOrder {
    pub fn new(symbol: &str, side: OrderSide, order_type: OrderType) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            order_type,
            quantity: None,
            quote_order_qty: None,
            price: None,
            time_in_force: None,
            new_client_order_id: None,
            stop_price: None,
            iceberg_qty: None,
            new_order_resp_type: None,
            extra: Params::new(),
        }
    }

    /// A GTC limit order.
    pub fn limit(symbol: &str, side: OrderSide, quantity: Decimal, price: Decimal) -> Self {
        let mut order = Self::new(symbol, side, OrderType::Limit);
        order.quantity = Some(quantity);
        order.price = Some(price);
        order.time_in_force = Some(TimeInForce::Gtc);
        order
    }

    /// A market order sized in the base asset.
    pub fn market(symbol: &str, side: OrderSide, quantity: Decimal) -> Self {
        let mut order = Self::new(symbol, side, OrderType::Market);
        order.quantity = Some(quantity);
        order
    }

    pub(crate) fn to_params(&self) -> Result<Params, ExchangeError> {
        let mut params = Params::new()
            .with("symbol", &self.symbol)
            .with("side", self.side.as_str())
            .with("type", self.order_type.as_str())
            .with_opt("timeInForce", self.time_in_force.map(TimeInForce::as_str))
            .with_opt("quantity", self.quantity)
            .with_opt("quoteOrderQty", self.quote_order_qty)
            .with_opt("price", self.price)
            .with_opt("newClientOrderId", self.new_client_order_id.as_deref())
            .with_opt("stopPrice", self.stop_price)
            .with_opt("icebergQty", self.iceberg_qty)
            .with_opt(
                "newOrderRespType",
                self.new_order_resp_type.map(NewOrderRespType::as_str),
            );
        params.merge_extra(self.extra.clone())?;
        Ok(params)
    }
}

/// Spot trading and account endpoints (signed).
pub struct SpotTradeClient<R: RestClient> {
    rest: BinanceRestClient<R>,
}

impl<R: RestClient + Clone> SpotTradeClient<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: BinanceRestClient::new(rest.clone()),
        }
    }

    #[instrument(skip(self, order), fields(venue = "binance", symbol = %order.symbol))]
    pub async fn new_order(&self, order: &NewOrder) -> Result<NewOrderResponse, ExchangeError> {
        self.rest.typed(&ORDER, order.to_params()?).await
    }

    /// Validate an order without hitting the matching engine; the server
    /// answers with an empty object.
    #[instrument(skip(self, order), fields(venue = "binance", symbol = %order.symbol))]
    pub async fn test_new_order(&self, order: &NewOrder) -> Result<(), ExchangeError> {
        self.rest.raw(&ORDER_TEST, order.to_params()?).await.map(|_| ())
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn query_order(
        &self,
        symbol: &str,
        order_id: Option<u64>,
        orig_client_order_id: Option<&str>,
    ) -> Result<Order, ExchangeError> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("orderId", order_id)
            .with_opt("origClientOrderId", orig_client_order_id);
        self.rest.typed(&ORDER_QUERY, params).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_id: Option<u64>,
        orig_client_order_id: Option<&str>,
    ) -> Result<CanceledOrder, ExchangeError> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("orderId", order_id)
            .with_opt("origClientOrderId", orig_client_order_id);
        self.rest.typed(&ORDER_CANCEL, params).await
    }

    /// Open orders for one symbol, or across all symbols when `symbol` is
    /// `None` (a heavily rate-weighted call; the weights are reported in
    /// `ExchangeInformation::rate_limits`, never enforced locally).
    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn open_orders(&self, symbol: Option<&str>) -> Result<Vec<Order>, ExchangeError> {
        let params = Params::new().with_opt("symbol", symbol);
        self.rest.typed(&OPEN_ORDERS, params).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn cancel_open_orders(
        &self,
        symbol: &str,
    ) -> Result<Vec<CanceledOrder>, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.rest.typed(&OPEN_ORDERS_CANCEL, params).await
    }

    /// Order history for a symbol. `extra` takes the endpoint's optional
    /// window parameters (`orderId`, `startTime`, `endTime`, `limit`).
    #[instrument(skip(self, extra), fields(venue = "binance", symbol = %symbol))]
    pub async fn all_orders(&self, symbol: &str, extra: Params) -> Result<Vec<Order>, ExchangeError> {
        let mut params = Params::new().with("symbol", symbol);
        params.merge_extra(extra)?;
        self.rest.typed(&ALL_ORDERS, params).await
    }

    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn account(&self) -> Result<Account, ExchangeError> {
        self.rest.typed(&ACCOUNT, Params::new()).await
    }

    /// Trades the account executed on a symbol. `extra` takes the endpoint's
    /// optional window parameters.
    #[instrument(skip(self, extra), fields(venue = "binance", symbol = %symbol))]
    pub async fn my_trades(&self, symbol: &str, extra: Params) -> Result<Vec<MyTrade>, ExchangeError> {
        let mut params = Params::new().with("symbol", symbol);
        params.merge_extra(extra)?;
        self.rest.typed(&MY_TRADES, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn limit_order_params_follow_wire_order() {
        let order = NewOrder::limit(
            "LTCBTC",
            OrderSide::Buy,
            Decimal::from(1),
            Decimal::from_str("0.1").unwrap(),
        );
        let params = order.to_params().unwrap();
        assert_eq!(
            params.to_query_string(),
            "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1"
        );
    }

    #[test]
    fn market_order_omits_price_fields() {
        let order = NewOrder::market("BTCUSDT", OrderSide::Sell, Decimal::from(2));
        let params = order.to_params().unwrap();
        assert_eq!(
            params.to_query_string(),
            "symbol=BTCUSDT&side=SELL&type=MARKET&quantity=2"
        );
    }

    #[test]
    fn extra_colliding_with_mandatory_is_rejected() {
        let mut order = NewOrder::market("BTCUSDT", OrderSide::Sell, Decimal::from(2));
        order.extra = Params::new().with("symbol", "ETHUSDT");
        let err = order.to_params().unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidParameters(_)));
    }

    #[test]
    fn extra_params_append_after_mandatory() {
        let mut order = NewOrder::market("BTCUSDT", OrderSide::Sell, Decimal::from(2));
        order.extra = Params::new().with("strategyId", 37);
        let params = order.to_params().unwrap();
        assert!(params.to_query_string().ends_with("quantity=2&strategyId=37"));
    }
}
