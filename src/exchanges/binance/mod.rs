pub mod builder;
pub mod connector;
pub mod market_data;
pub mod rest;
pub mod trading;
pub mod types;
pub mod wallet;

// Re-export main types for easier importing
pub use builder::{build_connector, build_connector_with_host, build_connector_with_probe};
pub use connector::BinanceConnector;
pub use market_data::MarketDataClient;
pub use rest::BinanceRestClient;
pub use trading::{NewOrder, NewOrderRespType, SpotTradeClient};
pub use types::{
    Account, AccountStatus, AssetDetail, AssetDetails, AveragePrice, Balance, BookTicker,
    Candlestick, CanceledOrder, DepositAddress, DepositRecord, ExchangeInformation, Fill,
    KlineInterval, MarketTrade, MyTrade, NewOrderAck, NewOrderFull, NewOrderResponse,
    NewOrderResult, Order, OrderBook, OrderSide, OrderStatus, OrderType, PriceTicker, RateLimit,
    SelfTradePreventionMode, ServerTime, SymbolFilter, SymbolInfo, SystemStatus, Ticker24h,
    TimeInForce, WithdrawRecord,
};
pub use wallet::WalletClient;
