//! Implements a struct that holds the state of the dashboard server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{dashboard::DashboardStore, rpc::BalanceBackend};

/// The default time a chart refuses further zooms after accepting one.
pub const DEFAULT_ZOOM_COOLDOWN: Duration = Duration::from_secs(2);

/// The state of the dashboard server.
#[derive(Clone)]
pub struct AppState {
    /// The balance backend that account names and balance series are fetched from.
    pub backend: Arc<dyn BalanceBackend>,

    /// The single user's dashboard: account matches, the submitted query and the charts.
    pub store: Arc<Mutex<DashboardStore>>,
}

impl AppState {
    /// Create a new [AppState] with an empty dashboard.
    ///
    /// Charts refuse zooms for `zoom_cooldown` after each accepted zoom.
    pub fn new(backend: Arc<dyn BalanceBackend>, zoom_cooldown: Duration) -> Self {
        Self {
            backend,
            store: Arc::new(Mutex::new(DashboardStore::new(zoom_cooldown))),
        }
    }
}
