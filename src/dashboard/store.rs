//! The dashboard's shared state: the account suggestions, the committed query
//! and one chart per currency.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use crate::{
    Error,
    account_search::MatchList,
    chart::{BalanceSeries, ChartView, FetchTicket, ZoomOutcome},
    currency::CurrencyCode,
    display_mode::DisplayMode,
    query::{ActiveQuery, QueryForm},
};

/// Everything the dashboard remembers between requests.
///
/// The store is shared behind a mutex that must never be held across an
/// `.await`. Fetches therefore take a [FetchTicket] under the lock, run
/// without it, and hand their result back with [DashboardStore::complete_fetch].
#[derive(Debug)]
pub struct DashboardStore {
    matches: MatchList,
    search_issued: u64,
    active_query: Option<ActiveQuery>,
    charts: BTreeMap<CurrencyCode, ChartView>,
}

impl DashboardStore {
    /// Create an empty store whose charts refuse zooms for `zoom_cooldown`
    /// after each accepted zoom.
    pub fn new(zoom_cooldown: Duration) -> Self {
        let charts = CurrencyCode::ALL
            .into_iter()
            .map(|currency| (currency, ChartView::new(currency, zoom_cooldown)))
            .collect();

        Self {
            matches: MatchList::default(),
            search_issued: 0,
            active_query: None,
            charts,
        }
    }

    pub fn matches(&self) -> &MatchList {
        &self.matches
    }

    /// Start an account search and return its generation.
    pub fn begin_search(&mut self) -> u64 {
        self.search_issued += 1;
        self.search_issued
    }

    /// Replace the match list with the result of the search `generation`.
    ///
    /// Returns the new match list, or `None` if a newer search has started.
    pub fn complete_search(&mut self, generation: u64, matches: MatchList) -> Option<MatchList> {
        if generation != self.search_issued {
            return None;
        }

        self.matches = matches;
        Some(self.matches.clone())
    }

    pub fn active_query(&self) -> Option<&ActiveQuery> {
        self.active_query.as_ref()
    }

    /// Validate `form` against the current matches and make it the active query.
    ///
    /// Every chart is cleared and a fetch ticket is returned for each selected
    /// currency and each submitted range. A rejected form leaves the store as it
    /// was.
    pub fn commit(&mut self, form: &QueryForm) -> Result<Vec<FetchTicket>, Error> {
        let query = form.commit(self.matches())?;

        for chart in self.charts.values_mut() {
            chart.clear();
        }

        let mut tickets = Vec::new();
        for currency in &query.currencies {
            if let Some(chart) = self.charts.get_mut(currency) {
                for range in query.ranges() {
                    tickets.push(chart.begin_fetch(&query.account_name, range));
                }
            }
        }

        self.active_query = Some(query);

        Ok(tickets)
    }

    /// Tickets for the selected charts that have nothing to show in `mode`.
    ///
    /// Charts that already hold a series for `mode`, or are fetching one, are
    /// left alone.
    pub fn missing_tickets(&mut self, mode: DisplayMode) -> Vec<FetchTicket> {
        let Some(query) = &self.active_query else {
            return Vec::new();
        };
        let Some(committed) = query.range_for(mode) else {
            return Vec::new();
        };

        let mut tickets = Vec::new();
        for currency in &query.currencies {
            let Some(chart) = self.charts.get_mut(currency) else {
                continue;
            };

            if chart.series(mode).is_none() && !chart.is_fetching(mode) {
                let range = chart.effective_range(committed);
                tickets.push(chart.begin_fetch(&query.account_name, range));
            }
        }

        tickets
    }

    /// The chart for `currency`, as long as `currency` is part of the active query.
    ///
    /// # Errors
    /// Returns [Error::NoActiveQuery] if nothing was submitted or `currency` was
    /// not selected.
    pub fn selected_chart(&self, currency: CurrencyCode) -> Result<&ChartView, Error> {
        let query = self.active_query.as_ref().ok_or(Error::NoActiveQuery)?;
        if !query.currencies.contains(&currency) {
            return Err(Error::NoActiveQuery);
        }

        self.charts.get(&currency).ok_or(Error::NoActiveQuery)
    }

    fn selected_chart_mut(
        &mut self,
        currency: CurrencyCode,
    ) -> Result<(&ActiveQuery, &mut ChartView), Error> {
        let query = self.active_query.as_ref().ok_or(Error::NoActiveQuery)?;
        if !query.currencies.contains(&currency) {
            return Err(Error::NoActiveQuery);
        }

        let chart = self.charts.get_mut(&currency).ok_or(Error::NoActiveQuery)?;

        Ok((query, chart))
    }

    /// Zoom the chart for `currency` to the window between the labels `start`
    /// and `end`.
    ///
    /// Returns the outcome of the zoom and the tickets to fetch the narrowed
    /// series with.
    pub fn zoom(
        &mut self,
        currency: CurrencyCode,
        start: &str,
        end: &str,
        now: Instant,
    ) -> Result<(ZoomOutcome, Vec<FetchTicket>), Error> {
        let (query, chart) = self.selected_chart_mut(currency)?;

        let outcome = chart.zoom(start, end, &query.ranges(), now);
        let tickets = match &outcome {
            ZoomOutcome::Applied(modes) => modes
                .iter()
                .filter_map(|mode| query.range_for(*mode))
                .map(|committed| {
                    let range = chart.effective_range(committed);
                    chart.begin_fetch(&query.account_name, range)
                })
                .collect(),
            ZoomOutcome::CoolingDown | ZoomOutcome::Ignored => Vec::new(),
        };

        Ok((outcome, tickets))
    }

    /// Return the chart for `currency` to the committed ranges.
    ///
    /// Returns one ticket per submitted range.
    pub fn reset(&mut self, currency: CurrencyCode) -> Result<Vec<FetchTicket>, Error> {
        let (query, chart) = self.selected_chart_mut(currency)?;

        chart.reset();

        Ok(query
            .ranges()
            .into_iter()
            .map(|range| chart.begin_fetch(&query.account_name, range))
            .collect())
    }

    /// Hand the result of a fetch back to the chart it was started for.
    ///
    /// Returns `false` if the result was stale and discarded.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<BalanceSeries, Error>,
    ) -> bool {
        match self.charts.get_mut(&ticket.currency) {
            Some(chart) => chart.complete_fetch(ticket, result),
            None => false,
        }
    }
}
