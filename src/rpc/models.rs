//! Request and response bodies of the backend procedures.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    chart::BalanceSeries,
    currency::CurrencyCode,
    query::{BlockRange, TimeRange},
};

#[derive(Debug, Serialize)]
pub(super) struct FindMatchingAccountsRequest<'a> {
    #[serde(rename = "_partial_account_name")]
    pub partial_account_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct BalanceByBlockRequest<'a> {
    #[serde(rename = "_account_name")]
    pub account_name: &'a str,
    #[serde(rename = "_coin_type")]
    pub coin_type: CurrencyCode,
    #[serde(rename = "_start_block")]
    pub start_block: u64,
    #[serde(rename = "_end_block")]
    pub end_block: u64,
    #[serde(rename = "_block_increment", skip_serializing_if = "Option::is_none")]
    pub block_increment: Option<u64>,
}

impl<'a> BalanceByBlockRequest<'a> {
    pub fn new(account_name: &'a str, currency: CurrencyCode, range: BlockRange) -> Self {
        Self {
            account_name,
            coin_type: currency,
            start_block: range.start(),
            end_block: range.end(),
            block_increment: Some(range.increment()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct BalanceByTimeRequest<'a> {
    #[serde(rename = "_account_name")]
    pub account_name: &'a str,
    #[serde(rename = "_coin_type")]
    pub coin_type: CurrencyCode,
    #[serde(rename = "_start_time")]
    pub start_time: String,
    #[serde(rename = "_end_time")]
    pub end_time: String,
    // The backend picks its own granularity when this is omitted.
    #[serde(rename = "_time_increment", skip_serializing_if = "Option::is_none")]
    pub time_increment: Option<String>,
}

impl<'a> BalanceByTimeRequest<'a> {
    pub fn new(
        account_name: &'a str,
        currency: CurrencyCode,
        range: TimeRange,
    ) -> Result<Self, Error> {
        let (start_time, end_time) = range.rpc_bounds()?;

        Ok(Self {
            account_name,
            coin_type: currency,
            start_time,
            end_time,
            time_increment: None,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct BlockSeriesResponse {
    #[serde(default)]
    pub block: Option<Vec<u64>>,
    #[serde(default)]
    pub balance: Option<Vec<Option<f64>>>,
}

impl From<BlockSeriesResponse> for BalanceSeries {
    fn from(response: BlockSeriesResponse) -> Self {
        BalanceSeries::from_blocks(response.block, response.balance)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TimeSeriesResponse {
    #[serde(default)]
    pub time: Option<Vec<String>>,
    #[serde(default)]
    pub balance: Option<Vec<Option<f64>>>,
}

impl TryFrom<TimeSeriesResponse> for BalanceSeries {
    type Error = Error;

    fn try_from(response: TimeSeriesResponse) -> Result<Self, Self::Error> {
        BalanceSeries::from_times(response.time, response.balance)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        currency::CurrencyCode,
        query::{BlockRange, TimeRange},
    };

    use super::{BalanceByBlockRequest, BalanceByTimeRequest, FindMatchingAccountsRequest};

    #[test]
    fn search_request_uses_underscored_field() {
        let request = FindMatchingAccountsRequest {
            partial_account_name: "dan",
        };

        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({ "_partial_account_name": "dan" })
        );
    }

    #[test]
    fn block_request_includes_increment() {
        let request = BalanceByBlockRequest::new(
            "dantheman",
            CurrencyCode::Hive,
            BlockRange::new(1000, 5000).unwrap(),
        );

        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "_account_name": "dantheman",
                "_coin_type": 21,
                "_start_block": 1000,
                "_end_block": 5000,
                "_block_increment": 4,
            })
        );
    }

    #[test]
    fn time_request_omits_increment() {
        let request = BalanceByTimeRequest::new(
            "dantheman",
            CurrencyCode::Hbd,
            TimeRange::new(datetime!(2021-01-01 00:00), datetime!(2021-02-01 00:00)).unwrap(),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "_account_name": "dantheman",
                "_coin_type": 13,
                "_start_time": "2021 01 01 00:00:00",
                "_end_time": "2021 02 01 00:00:00",
            })
        );
    }
}
