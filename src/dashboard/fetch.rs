//! Runs balance fetches against the backend and hands the results back to the
//! store.

use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;

use crate::{
    Error,
    chart::{BalanceSeries, FetchTicket},
    dashboard::DashboardStore,
    query::RangeSelection,
    rpc::BalanceBackend,
};

/// Fetch the series described by `ticket`.
pub async fn fetch_series(
    backend: &dyn BalanceBackend,
    ticket: &FetchTicket,
) -> Result<BalanceSeries, Error> {
    match ticket.range {
        RangeSelection::Block(range) => {
            backend
                .balance_by_block(&ticket.account_name, ticket.currency, range)
                .await
        }
        RangeSelection::Time(range) => {
            backend
                .balance_by_time(&ticket.account_name, ticket.currency, range)
                .await
        }
    }
}

/// Fetch every ticket concurrently and apply each result as it arrives.
///
/// Completions are applied in whatever order they finish. Results for tickets
/// that have been superseded are discarded.
///
/// # Errors
/// Returns [Error::StateLockError] if the store lock is poisoned.
pub async fn run_fetches(
    backend: Arc<dyn BalanceBackend>,
    store: Arc<Mutex<DashboardStore>>,
    tickets: Vec<FetchTicket>,
) -> Result<(), Error> {
    let mut fetches = JoinSet::new();

    for ticket in tickets {
        let backend = backend.clone();
        fetches.spawn(async move {
            let result = fetch_series(backend.as_ref(), &ticket).await;
            (ticket, result)
        });
    }

    while let Some(joined) = fetches.join_next().await {
        let (ticket, result) = match joined {
            Ok(completion) => completion,
            Err(error) => {
                tracing::error!("balance fetch task failed: {error}");
                continue;
            }
        };

        let mut store = store
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire dashboard lock: {error}"))
            .map_err(|_| Error::StateLockError)?;

        if !store.complete_fetch(&ticket, result) {
            tracing::debug!(
                "discarding stale {} balances for {} (generation {})",
                ticket.currency,
                ticket.account_name,
                ticket.generation
            );
        }
    }

    Ok(())
}
