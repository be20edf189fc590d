pub mod core;
pub mod exchanges;

pub use crate::core::config::ExchangeConfig;
pub use crate::core::errors::ExchangeError;
pub use crate::core::kernel::{Materialized, Params, ReturnFormat};
pub use crate::exchanges::binance::{build_connector, BinanceConnector};
