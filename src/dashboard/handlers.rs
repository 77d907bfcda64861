//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page, the query form, the display mode
//!   toggle and the per-chart zoom and reset actions
//! - HTML view functions for the query form and the charts section
//! - State and form types used by the handlers

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Form};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    chart::{FetchTicket, ZoomOutcome, chart_card},
    currency::CurrencyCode,
    dashboard::{DashboardStore, fetch::run_fetches},
    display_mode::DisplayMode,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    internal_server_error::get_internal_server_error_redirect,
    query::{ActiveQuery, QueryForm, format_datetime_local},
    rpc::BalanceBackend,
};

/// The ECharts build used to draw the balance charts.
const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for the dashboard page and its actions.
#[derive(Clone)]
pub struct DashboardState {
    /// The balance backend to fetch series from.
    pub backend: Arc<dyn BalanceBackend>,
    /// The dashboard shared across requests.
    pub store: Arc<Mutex<DashboardStore>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            store: state.store.clone(),
        }
    }
}

/// The visible window of a chart after a zoom gesture, as axis labels.
#[derive(Debug, Deserialize)]
pub struct ZoomForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

fn lock_store(store: &Mutex<DashboardStore>) -> Result<MutexGuard<'_, DashboardStore>, Error> {
    store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire dashboard lock: {error}"))
        .map_err(|_| Error::StateLockError)
}

/// Turn an error from an htmx request into a response htmx can act on.
fn htmx_error_response(error: Error) -> Response {
    match error {
        Error::StateLockError => get_internal_server_error_redirect(),
        error => error.into_alert_response(),
    }
}

/// Display the query form and the charts for the submitted query.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let mode = DisplayMode::from_cookies(&jar);
    let store = lock_store(&state.store)?;

    Ok(dashboard_view(&store, mode).into_response())
}

/// Commit the query form, fetch every series it asks for and return the
/// charts section.
pub async fn submit_query(
    State(state): State<DashboardState>,
    jar: CookieJar,
    Form(form): Form<QueryForm>,
) -> Response {
    let mode = DisplayMode::from_cookies(&jar);

    let tickets = match lock_store(&state.store).and_then(|mut store| store.commit(&form)) {
        Ok(tickets) => tickets,
        Err(error) => return htmx_error_response(error),
    };

    tracing::info!(
        "fetching {} series for {}",
        tickets.len(),
        form.account_name
    );

    if let Err(error) = run_fetches(state.backend.clone(), state.store.clone(), tickets).await {
        return htmx_error_response(error);
    }

    match lock_store(&state.store) {
        Ok(store) => charts_section(&store, mode).into_response(),
        Err(error) => htmx_error_response(error),
    }
}

/// Switch the charts between block and time mode.
///
/// Series already fetched for the new mode are shown as they are. Charts that
/// have never loaded a series for the new mode fetch one if the query has a
/// range for it.
pub async fn toggle_display_mode(State(state): State<DashboardState>, jar: CookieJar) -> Response {
    let mode = DisplayMode::from_cookies(&jar).toggled();

    let tickets = match lock_store(&state.store) {
        Ok(mut store) => store.missing_tickets(mode),
        Err(error) => return htmx_error_response(error),
    };

    if let Err(error) = run_fetches(state.backend.clone(), state.store.clone(), tickets).await {
        return htmx_error_response(error);
    }

    match lock_store(&state.store) {
        Ok(store) => (jar.add(mode.to_cookie()), charts_section(&store, mode)).into_response(),
        Err(error) => htmx_error_response(error),
    }
}

/// Narrow a chart to the window reported by a zoom gesture and return the chart.
///
/// Responds with 204 No Content if the chart is cooling down from the previous
/// zoom or the window is not a usable range.
pub async fn zoom_chart(
    State(state): State<DashboardState>,
    jar: CookieJar,
    Path(currency_code): Path<u16>,
    Form(form): Form<ZoomForm>,
) -> Response {
    let mode = DisplayMode::from_cookies(&jar);

    let currency = match CurrencyCode::try_from(currency_code) {
        Ok(currency) => currency,
        Err(error) => return htmx_error_response(error),
    };

    let zoomed = lock_store(&state.store).and_then(|mut store| {
        store.zoom(currency, &form.start, &form.end, Instant::now())
    });

    let tickets = match zoomed {
        Ok((ZoomOutcome::Applied(_), tickets)) => tickets,
        Ok((outcome, _)) => {
            tracing::debug!(
                "not zooming {currency} to {:?}..{:?}: {outcome:?}",
                form.start,
                form.end
            );
            return StatusCode::NO_CONTENT.into_response();
        }
        Err(error) => return htmx_error_response(error),
    };

    refresh_chart(&state, currency, mode, tickets).await
}

/// Return a chart to the submitted ranges and return the chart.
pub async fn reset_chart(
    State(state): State<DashboardState>,
    jar: CookieJar,
    Path(currency_code): Path<u16>,
) -> Response {
    let mode = DisplayMode::from_cookies(&jar);

    let currency = match CurrencyCode::try_from(currency_code) {
        Ok(currency) => currency,
        Err(error) => return htmx_error_response(error),
    };

    let tickets = match lock_store(&state.store).and_then(|mut store| store.reset(currency)) {
        Ok(tickets) => tickets,
        Err(error) => return htmx_error_response(error),
    };

    refresh_chart(&state, currency, mode, tickets).await
}

async fn refresh_chart(
    state: &DashboardState,
    currency: CurrencyCode,
    mode: DisplayMode,
    tickets: Vec<FetchTicket>,
) -> Response {
    if let Err(error) = run_fetches(state.backend.clone(), state.store.clone(), tickets).await {
        return htmx_error_response(error);
    }

    let card = lock_store(&state.store).and_then(|store| {
        let query = store.active_query().ok_or(Error::NoActiveQuery)?;
        let chart = store.selected_chart(currency)?;

        Ok(chart_card(chart, mode, query.range_for(mode)))
    });

    match card {
        Ok(card) => card.into_response(),
        Err(error) => htmx_error_response(error),
    }
}

fn dashboard_view(store: &DashboardStore, mode: DisplayMode) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Balance Viewer" }

            (query_form_view(store.active_query()))

            (charts_section(store, mode))
        }
    };

    base(
        "Dashboard",
        &[HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())],
        &content,
    )
}

/// The values to prefill the query form with.
struct FormValues {
    account_name: String,
    currencies: Vec<CurrencyCode>,
    start_block: String,
    end_block: String,
    start_time: String,
    end_time: String,
}

impl FormValues {
    fn from_query(query: Option<&ActiveQuery>) -> Self {
        let Some(query) = query else {
            return Self {
                account_name: String::new(),
                currencies: Vec::new(),
                start_block: String::new(),
                end_block: String::new(),
                start_time: String::new(),
                end_time: String::new(),
            };
        };

        let (start_block, end_block) = query
            .block_range
            .map(|range| (range.start().to_string(), range.end().to_string()))
            .unwrap_or_default();
        let (start_time, end_time) = query
            .time_range
            .map(|range| {
                (
                    format_datetime_local(&range.start()).unwrap_or_default(),
                    format_datetime_local(&range.end()).unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        Self {
            account_name: query.account_name.clone(),
            currencies: query.currencies.iter().copied().collect(),
            start_block,
            end_block,
            start_time,
            end_time,
        }
    }
}

fn query_form_view(query: Option<&ActiveQuery>) -> Markup {
    let values = FormValues::from_query(query);
    let spinner = loading_spinner();
    // Block bounds only ever hold digits.
    let digits_only = "this.value = this.value.replace(/[^0-9]/g, '')";

    html! {
        form
            hx-post=(endpoints::QUERY_API)
            hx-target="#charts"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full max-w-3xl space-y-4 mb-6"
        {
            div
            {
                label for="account_name" class=(FORM_LABEL_STYLE) { "Account" }

                input
                    name="account_name"
                    id="account_name"
                    type="search"
                    list="account-matches"
                    autocomplete="off"
                    placeholder="Start typing an account name"
                    value=(values.account_name)
                    hx-get=(endpoints::ACCOUNTS_API)
                    hx-trigger="input changed delay:250ms, load"
                    hx-target="#account-matches"
                    hx-swap="innerHTML"
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id="account-matches" {}
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Currencies" }

                div class="flex gap-6"
                {
                    @for currency in CurrencyCode::ALL {
                        label class="flex items-center gap-2"
                        {
                            input
                                type="checkbox"
                                name="currencies"
                                value=(currency.code())
                                checked[values.currencies.contains(&currency)]
                                class=(FORM_CHECKBOX_STYLE);

                            (currency.symbol()) " (" (currency.code()) ")"
                        }
                    }
                }
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                div
                {
                    label for="start_block" class=(FORM_LABEL_STYLE) { "Start block" }
                    input
                        name="start_block"
                        id="start_block"
                        type="text"
                        inputmode="numeric"
                        value=(values.start_block)
                        oninput=(digits_only)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end_block" class=(FORM_LABEL_STYLE) { "End block" }
                    input
                        name="end_block"
                        id="end_block"
                        type="text"
                        inputmode="numeric"
                        value=(values.end_block)
                        oninput=(digits_only)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="start_time" class=(FORM_LABEL_STYLE) { "Start date" }
                    input
                        name="start_time"
                        id="start_time"
                        type="datetime-local"
                        step="1"
                        value=(values.start_time)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end_time" class=(FORM_LABEL_STYLE) { "End date" }
                    input
                        name="end_time"
                        id="end_time"
                        type="datetime-local"
                        step="1"
                        value=(values.end_time)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Show balances"
            }
        }
    }
}

fn charts_section(store: &DashboardStore, mode: DisplayMode) -> Markup {
    html! {
        section
            id="charts"
            class="w-full max-w-5xl"
        {
            @match store.active_query() {
                None => {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "Search for an account, choose at least one currency and a block "
                        "or date range, then submit to see balances."
                    }
                }
                Some(query) => {
                    div class="flex flex-wrap items-center justify-between gap-2 mb-4"
                    {
                        h2 class="text-xl font-bold"
                        {
                            "Showing balances for " (query.account_name)
                        }

                        button
                            id="display-mode-toggle"
                            type="button"
                            class=(BUTTON_SECONDARY_STYLE)
                            hx-post=(endpoints::DISPLAY_MODE_API)
                            hx-target="#charts"
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                        {
                            (mode.toggle_label())
                        }
                    }

                    p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Balances are shown by " (mode.axis_name().to_lowercase()) ". "
                        "Scroll or pinch on a chart to zoom into a range, "
                        "or use \"Reset chart\" to go back to the submitted range."
                    }

                    div class="grid grid-cols-1 gap-4"
                    {
                        @for currency in &query.currencies {
                            @if let Ok(chart) = store.selected_chart(*currency) {
                                (chart_card(chart, mode, query.range_for(mode)))
                            }
                        }
                    }
                }
            }
        }
    }
}
