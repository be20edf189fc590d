use crate::core::errors::ExchangeError;
use crate::core::kernel::{Endpoint, Params, RestClient, SecurityType};
use crate::exchanges::binance::rest::BinanceRestClient;
use crate::exchanges::binance::types::{
    AccountStatus, AssetDetails, DepositAddress, DepositRecord, SystemStatus, WithdrawRecord,
};
use tracing::instrument;

const SYSTEM_STATUS: Endpoint = Endpoint::get("/sapi/v1/system/status", SecurityType::None);
const ACCOUNT_STATUS: Endpoint = Endpoint::get("/sapi/v1/account/status", SecurityType::Signed);
const DEPOSIT_ADDRESS: Endpoint =
    Endpoint::get("/sapi/v1/capital/deposit/address", SecurityType::Signed);
const DEPOSIT_HISTORY: Endpoint =
    Endpoint::get("/sapi/v1/capital/deposit/hisrec", SecurityType::Signed);
const WITHDRAW_HISTORY: Endpoint =
    Endpoint::get("/sapi/v1/capital/withdraw/history", SecurityType::Signed);
const ASSET_DETAIL: Endpoint = Endpoint::get("/sapi/v1/asset/assetDetail", SecurityType::Signed);

/// Wallet endpoints: system status, deposits, withdrawals, asset details.
pub struct WalletClient<R: RestClient> {
    rest: BinanceRestClient<R>,
}

impl<R: RestClient + Clone> WalletClient<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: BinanceRestClient::new(rest.clone()),
        }
    }

    /// The wallet-reported system status. Independent of the probe-based
    /// maintenance detection at construction time.
    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn system_status(&self) -> Result<SystemStatus, ExchangeError> {
        self.rest.typed(&SYSTEM_STATUS, Params::new()).await
    }

    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn account_status(&self) -> Result<AccountStatus, ExchangeError> {
        self.rest.typed(&ACCOUNT_STATUS, Params::new()).await
    }

    #[instrument(skip(self), fields(venue = "binance", coin = %coin))]
    pub async fn deposit_address(
        &self,
        coin: &str,
        network: Option<&str>,
    ) -> Result<DepositAddress, ExchangeError> {
        let params = Params::new().with("coin", coin).with_opt("network", network);
        self.rest.typed(&DEPOSIT_ADDRESS, params).await
    }

    /// Deposit history. `extra` takes the endpoint's optional filters
    /// (`coin`, `status`, `startTime`, `endTime`, `offset`, `limit`).
    #[instrument(skip(self, extra), fields(venue = "binance"))]
    pub async fn deposit_history(&self, extra: Params) -> Result<Vec<DepositRecord>, ExchangeError> {
        let mut params = Params::new();
        params.merge_extra(extra)?;
        self.rest.typed(&DEPOSIT_HISTORY, params).await
    }

    /// Withdraw history. `extra` takes the endpoint's optional filters.
    #[instrument(skip(self, extra), fields(venue = "binance"))]
    pub async fn withdraw_history(
        &self,
        extra: Params,
    ) -> Result<Vec<WithdrawRecord>, ExchangeError> {
        let mut params = Params::new();
        params.merge_extra(extra)?;
        self.rest.typed(&WITHDRAW_HISTORY, params).await
    }

    /// Per-asset deposit/withdraw details, keyed by asset symbol.
    #[instrument(skip(self), fields(venue = "binance"))]
    pub async fn asset_detail(&self, asset: Option<&str>) -> Result<AssetDetails, ExchangeError> {
        let params = Params::new().with_opt("asset", asset);
        self.rest.typed(&ASSET_DETAIL, params).await
    }
}
