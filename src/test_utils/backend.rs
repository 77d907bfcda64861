use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    Error,
    chart::BalanceSeries,
    currency::CurrencyCode,
    query::{BlockRange, TimeRange},
    rpc::BalanceBackend,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BackendCall {
    FindAccounts(String),
    ByBlock {
        account_name: String,
        currency: CurrencyCode,
        range: BlockRange,
    },
    ByTime {
        account_name: String,
        currency: CurrencyCode,
        range: TimeRange,
    },
}

#[derive(Debug, Default)]
struct FakeBackendInner {
    accounts: Vec<String>,
    block_series: (Vec<u64>, Vec<Option<f64>>),
    time_series: (Vec<String>, Vec<Option<f64>>),
    fail_account_search: bool,
    fail_balances: bool,
    calls: Vec<BackendCall>,
}

/// An in-memory [BalanceBackend] that answers every call with canned data and
/// records the calls it receives.
///
/// Clones share the same canned data and call log.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBackend {
    inner: Arc<Mutex<FakeBackendInner>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_accounts(self, accounts: &[&str]) -> Self {
        self.inner.lock().unwrap().accounts = accounts.iter().map(|name| name.to_string()).collect();
        self
    }

    pub(crate) fn with_block_series(self, blocks: Vec<u64>, balances: Vec<Option<f64>>) -> Self {
        self.inner.lock().unwrap().block_series = (blocks, balances);
        self
    }

    pub(crate) fn with_time_series(self, times: &[&str], balances: Vec<Option<f64>>) -> Self {
        self.inner.lock().unwrap().time_series = (
            times.iter().map(|time| time.to_string()).collect(),
            balances,
        );
        self
    }

    pub(crate) fn fail_account_search(&self) {
        self.inner.lock().unwrap().fail_account_search = true;
    }

    pub(crate) fn fail_balances(&self) {
        self.inner.lock().unwrap().fail_balances = true;
    }

    pub(crate) fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub(crate) fn balance_calls(&self) -> Vec<BackendCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, BackendCall::FindAccounts(_)))
            .collect()
    }

    pub(crate) fn account_searches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::FindAccounts(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl BalanceBackend for FakeBackend {
    async fn find_matching_accounts(
        &self,
        partial_account_name: &str,
    ) -> Result<Vec<String>, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(BackendCall::FindAccounts(partial_account_name.to_owned()));

        if inner.fail_account_search {
            return Err(Error::Rpc("account search failed".to_owned()));
        }

        Ok(inner.accounts.clone())
    }

    async fn balance_by_block(
        &self,
        account_name: &str,
        currency: CurrencyCode,
        range: BlockRange,
    ) -> Result<BalanceSeries, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(BackendCall::ByBlock {
            account_name: account_name.to_owned(),
            currency,
            range,
        });

        if inner.fail_balances {
            return Err(Error::Rpc("balance fetch failed".to_owned()));
        }

        let (blocks, balances) = inner.block_series.clone();
        Ok(BalanceSeries::from_blocks(Some(blocks), Some(balances)))
    }

    async fn balance_by_time(
        &self,
        account_name: &str,
        currency: CurrencyCode,
        range: TimeRange,
    ) -> Result<BalanceSeries, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(BackendCall::ByTime {
            account_name: account_name.to_owned(),
            currency,
            range,
        });

        if inner.fail_balances {
            return Err(Error::Rpc("balance fetch failed".to_owned()));
        }

        let (times, balances) = inner.time_series.clone();
        BalanceSeries::from_times(Some(times), Some(balances))
    }
}
