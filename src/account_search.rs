//! Suggests account names for the partial name typed into the search box.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;
use serde::Deserialize;

use crate::{AppState, dashboard::DashboardStore, rpc::BalanceBackend};

/// The account names returned by the most recent successful search.
///
/// The list is replaced wholesale by each search and is never filtered locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchList(Vec<String>);

impl MatchList {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Whether `name` is exactly one of the matched names.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|candidate| candidate == name)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// The state needed to search for accounts.
#[derive(Clone)]
pub struct AccountSearchState {
    pub backend: Arc<dyn BalanceBackend>,
    pub store: Arc<Mutex<DashboardStore>>,
}

impl FromRef<AppState> for AccountSearchState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            store: state.store.clone(),
        }
    }
}

/// The query string of an account search.
///
/// The search box is the form's `account_name` input, so that name is accepted too.
#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    #[serde(default, alias = "account_name")]
    pub partial_account_name: String,
}

/// Route handler that renders the matching account names as `<option>`s.
///
/// A failed or superseded search responds with 204 No Content so the browser
/// keeps showing the previous suggestions.
pub async fn search_accounts(
    State(state): State<AccountSearchState>,
    Query(query): Query<AccountQuery>,
) -> Response {
    let generation = match state.store.lock() {
        Ok(mut store) => store.begin_search(),
        Err(error) => {
            tracing::error!("could not acquire dashboard lock: {error}");
            return StatusCode::NO_CONTENT.into_response();
        }
    };

    let names = match state
        .backend
        .find_matching_accounts(&query.partial_account_name)
        .await
    {
        Ok(names) => names,
        Err(error) => {
            tracing::error!(
                "could not search for accounts matching \"{}\": {error}",
                query.partial_account_name
            );
            return StatusCode::NO_CONTENT.into_response();
        }
    };

    let matches = match state.store.lock() {
        Ok(mut store) => store.complete_search(generation, MatchList::new(names)),
        Err(error) => {
            tracing::error!("could not acquire dashboard lock: {error}");
            return StatusCode::NO_CONTENT.into_response();
        }
    };

    match matches {
        Some(matches) => match_options(&matches).into_response(),
        None => {
            tracing::debug!(
                "discarding stale account search for \"{}\"",
                query.partial_account_name
            );
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

fn match_options(matches: &MatchList) -> maud::Markup {
    html! {
        @for name in matches.names() {
            option value=(name) {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        dashboard::DashboardStore,
        test_utils::{FakeBackend, assert_status_ok, parse_html_fragment},
    };

    use super::{AccountQuery, AccountSearchState, MatchList, search_accounts};

    fn state(backend: FakeBackend) -> AccountSearchState {
        AccountSearchState {
            backend: Arc::new(backend),
            store: Arc::new(Mutex::new(DashboardStore::new(Duration::from_secs(2)))),
        }
    }

    fn query(text: &str) -> Query<AccountQuery> {
        Query(AccountQuery {
            partial_account_name: text.to_owned(),
        })
    }

    #[test]
    fn match_list_requires_exact_name() {
        let matches = MatchList::new(vec!["dantheman".to_owned()]);

        assert!(matches.contains("dantheman"));
        assert!(!matches.contains("dan"));
        assert!(!matches.contains("DANTHEMAN"));
    }

    #[tokio::test]
    async fn renders_backend_names_as_options() {
        let backend = FakeBackend::new().with_accounts(&["dantheman", "danny"]);
        let state = state(backend.clone());

        let response = search_accounts(State(state.clone()), query("dan")).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let values: Vec<_> = html
            .select(&Selector::parse("option").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect();
        assert_eq!(values, vec!["dantheman", "danny"]);
        assert_eq!(backend.account_searches(), vec!["dan".to_owned()]);
        assert_eq!(
            state.store.lock().unwrap().matches(),
            &MatchList::new(vec!["dantheman".to_owned(), "danny".to_owned()])
        );
    }

    #[tokio::test]
    async fn empty_search_is_forwarded() {
        let backend = FakeBackend::new().with_accounts(&[]);

        let response = search_accounts(State(state(backend.clone())), query("")).await;

        assert_status_ok(&response);
        assert_eq!(backend.account_searches(), vec![String::new()]);
    }

    #[tokio::test]
    async fn failure_keeps_previous_matches() {
        let backend = FakeBackend::new().with_accounts(&["dantheman"]);
        let state = state(backend.clone());
        search_accounts(State(state.clone()), query("dan")).await;

        backend.fail_account_search();
        let response = search_accounts(State(state.clone()), query("dant")).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.store.lock().unwrap().matches().contains("dantheman"));
    }
}
