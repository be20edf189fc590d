use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    classify, from_json, materialize, Endpoint, Materialized, Params, RestClient, ReturnFormat,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Thin wrapper around [`RestClient`] carrying the shared response pipeline.
///
/// Every facade method is the same three steps - send, classify, materialize -
/// parameterized by the endpoint, the parameter bag, and the requested
/// representation. This is the single generic call path; there are no
/// per-format method triplets.
pub struct BinanceRestClient<R: RestClient> {
    client: R,
}

impl<R: RestClient> BinanceRestClient<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    /// Full pipeline with an explicit [`ReturnFormat`] and an optional
    /// endpoint-specific mapping function (required for `TypedObject`).
    pub async fn fetch<T, F>(
        &self,
        endpoint: &Endpoint,
        params: Params,
        format: ReturnFormat,
        mapper: Option<F>,
    ) -> Result<Materialized<T>, ExchangeError>
    where
        F: FnOnce(Value) -> Result<T, ExchangeError> + Send,
    {
        let response = self.client.send(endpoint, params).await?;
        let response = classify(response)?;
        materialize(response, format, mapper)
    }

    /// Materialize into a serde-derived record.
    pub async fn typed<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: Params,
    ) -> Result<T, ExchangeError> {
        self.fetch(endpoint, params, ReturnFormat::TypedObject, Some(from_json::<T>))
            .await?
            .into_typed()
    }

    /// Materialize through a hand-written mapping function.
    pub async fn mapped<T, F>(
        &self,
        endpoint: &Endpoint,
        params: Params,
        mapper: F,
    ) -> Result<T, ExchangeError>
    where
        F: FnOnce(Value) -> Result<T, ExchangeError> + Send,
    {
        self.fetch(endpoint, params, ReturnFormat::TypedObject, Some(mapper))
            .await?
            .into_typed()
    }

    /// Materialize as a generic JSON tree.
    pub async fn json(&self, endpoint: &Endpoint, params: Params) -> Result<Value, ExchangeError> {
        self.fetch::<Value, fn(Value) -> Result<Value, ExchangeError>>(
            endpoint,
            params,
            ReturnFormat::GenericJson,
            None,
        )
        .await?
        .into_json()
    }

    /// Materialize as the verbatim body text.
    pub async fn raw(&self, endpoint: &Endpoint, params: Params) -> Result<String, ExchangeError> {
        self.fetch::<Value, fn(Value) -> Result<Value, ExchangeError>>(
            endpoint,
            params,
            ReturnFormat::RawText,
            None,
        )
        .await?
        .into_raw()
    }
}
