use crate::core::errors::ExchangeError;
use crate::core::kernel::{Endpoint, Params, RestClient, SecurityType};
use crate::exchanges::binance::rest::BinanceRestClient;
use crate::exchanges::binance::types::{
    AveragePrice, BookTicker, Candlestick, ExchangeInformation, KlineInterval, MarketTrade,
    OrderBook, PriceTicker, ServerTime, Ticker24h,
};
use tracing::instrument;

const PING: Endpoint = Endpoint::get("/api/v3/ping", SecurityType::None);
const SERVER_TIME: Endpoint = Endpoint::get("/api/v3/time", SecurityType::None);
const EXCHANGE_INFO: Endpoint = Endpoint::get("/api/v3/exchangeInfo", SecurityType::None);
const DEPTH: Endpoint = Endpoint::get("/api/v3/depth", SecurityType::None);
const TRADES: Endpoint = Endpoint::get("/api/v3/trades", SecurityType::None);
const KLINES: Endpoint = Endpoint::get("/api/v3/klines", SecurityType::None);
const AVG_PRICE: Endpoint = Endpoint::get("/api/v3/avgPrice", SecurityType::None);
const TICKER_24H: Endpoint = Endpoint::get("/api/v3/ticker/24hr", SecurityType::None);
const TICKER_PRICE: Endpoint = Endpoint::get("/api/v3/ticker/price", SecurityType::None);
const BOOK_TICKER: Endpoint = Endpoint::get("/api/v3/ticker/bookTicker", SecurityType::None);

/// Market data endpoints (public, unsigned).
pub struct MarketDataClient<R: RestClient> {
    rest: BinanceRestClient<R>,
}

impl<R: RestClient + Clone> MarketDataClient<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: BinanceRestClient::new(rest.clone()),
        }
    }

    /// Connectivity check; the server answers with an empty object.
    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn ping(&self) -> Result<(), ExchangeError> {
        self.rest.raw(&PING, Params::new()).await.map(|_| ())
    }

    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn server_time(&self) -> Result<ServerTime, ExchangeError> {
        self.rest.typed(&SERVER_TIME, Params::new()).await
    }

    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn exchange_info(&self) -> Result<ExchangeInformation, ExchangeError> {
        self.rest.typed(&EXCHANGE_INFO, Params::new()).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn exchange_info_for_symbol(
        &self,
        symbol: &str,
    ) -> Result<ExchangeInformation, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.rest.typed(&EXCHANGE_INFO, params).await
    }

    /// Exchange information restricted to several symbols; rendered in the
    /// JSON-array wire form the endpoint expects.
    #[instrument(skip(self, symbols), fields(venue = "binance"))]
    pub async fn exchange_info_for_symbols(
        &self,
        symbols: &[&str],
    ) -> Result<ExchangeInformation, ExchangeError> {
        let params = Params::new().with_list("symbols", symbols);
        self.rest.typed(&EXCHANGE_INFO, params).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn order_book(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        let params = Params::new().with("symbol", symbol).with_opt("limit", limit);
        self.rest.typed(&DEPTH, params).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn recent_trades(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<MarketTrade>, ExchangeError> {
        let params = Params::new().with("symbol", symbol).with_opt("limit", limit);
        self.rest.typed(&TRADES, params).await
    }

    /// Candlestick data. The wire shape is a heterogeneous array per row, so
    /// this goes through the hand-written mapping instead of serde derive.
    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol, interval = %interval))]
    pub async fn klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: Option<u32>,
        start_time: Option<u64>,
        end_time: Option<u64>,
    ) -> Result<Vec<Candlestick>, ExchangeError> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("interval", interval.as_str())
            .with_opt("limit", limit)
            .with_opt("startTime", start_time)
            .with_opt("endTime", end_time);
        self.rest.mapped(&KLINES, params, Candlestick::from_series).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn average_price(&self, symbol: &str) -> Result<AveragePrice, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.rest.typed(&AVG_PRICE, params).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.rest.typed(&TICKER_24H, params).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn price_ticker(&self, symbol: &str) -> Result<PriceTicker, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.rest.typed(&TICKER_PRICE, params).await
    }

    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn all_price_tickers(&self) -> Result<Vec<PriceTicker>, ExchangeError> {
        self.rest.typed(&TICKER_PRICE, Params::new()).await
    }

    #[instrument(skip(self), fields(venue = "binance", symbol = %symbol))]
    pub async fn book_ticker(&self, symbol: &str) -> Result<BookTicker, ExchangeError> {
        let params = Params::new().with("symbol", symbol);
        self.rest.typed(&BOOK_TICKER, params).await
    }
}
