//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    account_search::search_accounts,
    dashboard::{get_dashboard_page, reset_chart, submit_query, toggle_display_mode, zoom_chart},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(endpoints::ACCOUNTS_API, get(search_accounts))
        .route(endpoints::QUERY_API, post(submit_query))
        .route(endpoints::DISPLAY_MODE_API, post(toggle_display_mode))
        .route(endpoints::CHART_ZOOM, post(zoom_chart))
        .route(endpoints::CHART_RESET, post(reset_chart))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
