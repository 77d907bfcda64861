//! Access to the remote balance backend.
//!
//! [BalanceBackend] is the seam between the dashboard and the backend so that
//! handlers can be tested against an in-memory backend. [RpcClient] is the
//! implementation used by the server.

mod client;
mod models;

use async_trait::async_trait;

pub use client::RpcClient;

use crate::{
    Error,
    chart::BalanceSeries,
    currency::CurrencyCode,
    query::{BlockRange, TimeRange},
};

/// The procedures the dashboard calls on the balance backend.
#[async_trait]
pub trait BalanceBackend: Send + Sync {
    /// The names of the accounts that match `partial_account_name`.
    async fn find_matching_accounts(&self, partial_account_name: &str)
    -> Result<Vec<String>, Error>;

    /// The balance history of `account_name` in `currency`, sampled across `range`.
    async fn balance_by_block(
        &self,
        account_name: &str,
        currency: CurrencyCode,
        range: BlockRange,
    ) -> Result<BalanceSeries, Error>;

    /// The balance history of `account_name` in `currency`, sampled across `range`.
    async fn balance_by_time(
        &self,
        account_name: &str,
        currency: CurrencyCode,
        range: TimeRange,
    ) -> Result<BalanceSeries, Error>;
}
