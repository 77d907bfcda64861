//! JSON-over-HTTP client for the balance backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Error,
    chart::BalanceSeries,
    currency::CurrencyCode,
    query::{BlockRange, TimeRange},
    rpc::{
        BalanceBackend,
        models::{
            BalanceByBlockRequest, BalanceByTimeRequest, BlockSeriesResponse,
            FindMatchingAccountsRequest, TimeSeriesResponse,
        },
    },
};

/// Calls the backend procedures at `{base_url}/rpc/{procedure}`.
#[derive(Debug, Clone)]
pub struct RpcClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl RpcClient {
    /// Create a client for the backend at `base_url`, e.g. "http://localhost:3000".
    ///
    /// # Errors
    /// Returns [Error::Rpc] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::Rpc(format!("could not build HTTP client: {error}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client,
        })
    }

    async fn call<Req, Resp>(&self, procedure: &str, body: &Req) -> Result<Resp, Error>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/rpc/{procedure}", self.base_url);
        tracing::debug!("calling {url}");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| Error::Rpc(format!("{procedure}: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Rpc(format!("{procedure} returned {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|error| Error::Rpc(format!("{procedure}: {error}")))?;

        decode_double_encoded(&text)
            .map_err(|error| Error::Decode(format!("{procedure}: {error}")))
    }
}

/// Decode a response body whose JSON document is itself wrapped in a JSON string.
///
/// A body that is already a JSON document is decoded directly.
fn decode_double_encoded<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;

    let document = match value {
        Value::String(inner) => serde_json::from_str(&inner)?,
        document => document,
    };

    serde_json::from_value(document)
}

#[async_trait]
impl BalanceBackend for RpcClient {
    async fn find_matching_accounts(
        &self,
        partial_account_name: &str,
    ) -> Result<Vec<String>, Error> {
        let names: Option<Vec<String>> = self
            .call(
                "find_matching_accounts",
                &FindMatchingAccountsRequest {
                    partial_account_name,
                },
            )
            .await?;

        Ok(names.unwrap_or_default())
    }

    async fn balance_by_block(
        &self,
        account_name: &str,
        currency: CurrencyCode,
        range: BlockRange,
    ) -> Result<BalanceSeries, Error> {
        let response: BlockSeriesResponse = self
            .call(
                "get_balance_for_coin_by_block",
                &BalanceByBlockRequest::new(account_name, currency, range),
            )
            .await?;

        Ok(response.into())
    }

    async fn balance_by_time(
        &self,
        account_name: &str,
        currency: CurrencyCode,
        range: TimeRange,
    ) -> Result<BalanceSeries, Error> {
        let request = BalanceByTimeRequest::new(account_name, currency, range)?;
        let response: TimeSeriesResponse = self
            .call("get_balance_for_coin_by_time", &request)
            .await?;

        response.try_into()
    }
}
