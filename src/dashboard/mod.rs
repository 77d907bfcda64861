//! Dashboard module
//!
//! Provides the page with the account search and query form, and the charts
//! that show an account's balance history per currency. Includes the shared
//! store the charts live in and the fetcher that fills them.

mod fetch;
mod handlers;
mod store;

pub use handlers::{
    get_dashboard_page, reset_chart, submit_query, toggle_display_mode, zoom_chart,
};
pub use store::DashboardStore;
