//! The state of one currency's chart: its series, zoom windows and in-flight
//! fetches for each display mode.

use std::time::{Duration, Instant};

use crate::{
    Error,
    chart::BalanceSeries,
    currency::CurrencyCode,
    display_mode::DisplayMode,
    query::{BlockRange, RangeSelection, TimeRange, parse_timestamp},
};

/// Where a chart is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartState {
    /// No series has been accepted since the last submitted query.
    Idle,
    /// Showing series for the committed ranges.
    Loaded,
    /// Showing series for a range narrowed by a zoom gesture.
    Zoomed,
}

/// Identifies one fetch so that its result can be discarded if a newer fetch
/// for the same chart and mode was started in the meantime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub account_name: String,
    pub currency: CurrencyCode,
    pub range: RangeSelection,
    pub generation: u64,
}

/// What happened to a zoom gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoomOutcome {
    /// The zoom windows of these modes changed and need fetching.
    Applied(Vec<DisplayMode>),
    /// The chart was zoomed too recently.
    CoolingDown,
    /// The labels do not describe a valid window inside the range currently
    /// shown for any committed mode.
    Ignored,
}

/// A series together with the range it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub range: RangeSelection,
    pub series: BalanceSeries,
}

#[derive(Debug, Default)]
struct ModeSlot {
    zoom: Option<RangeSelection>,
    issued: u64,
    settled: u64,
    loaded: Option<LoadedSeries>,
}

impl ModeSlot {
    fn clear(&mut self) {
        self.zoom = None;
        self.loaded = None;
        // Invalidate any fetch still in flight.
        self.issued += 1;
        self.settled = self.issued;
    }
}

/// One chart, parameterized by its currency.
#[derive(Debug)]
pub struct ChartView {
    currency: CurrencyCode,
    cooldown: Duration,
    last_zoom: Option<Instant>,
    block: ModeSlot,
    time: ModeSlot,
}

impl ChartView {
    pub fn new(currency: CurrencyCode, cooldown: Duration) -> Self {
        Self {
            currency,
            cooldown,
            last_zoom: None,
            block: ModeSlot::default(),
            time: ModeSlot::default(),
        }
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    fn slot(&self, mode: DisplayMode) -> &ModeSlot {
        match mode {
            DisplayMode::Block => &self.block,
            DisplayMode::Time => &self.time,
        }
    }

    fn slot_mut(&mut self, mode: DisplayMode) -> &mut ModeSlot {
        match mode {
            DisplayMode::Block => &mut self.block,
            DisplayMode::Time => &mut self.time,
        }
    }

    pub fn state(&self) -> ChartState {
        if self.block.loaded.is_none() && self.time.loaded.is_none() {
            ChartState::Idle
        } else if self.block.zoom.is_some() || self.time.zoom.is_some() {
            ChartState::Zoomed
        } else {
            ChartState::Loaded
        }
    }

    /// The most recently accepted series for `mode`.
    pub fn series(&self, mode: DisplayMode) -> Option<&LoadedSeries> {
        self.slot(mode).loaded.as_ref()
    }

    pub fn zoom_window(&self, mode: DisplayMode) -> Option<RangeSelection> {
        self.slot(mode).zoom
    }

    /// Whether a fetch for `mode` has been started and not yet completed.
    pub fn is_fetching(&self, mode: DisplayMode) -> bool {
        let slot = self.slot(mode);
        slot.settled < slot.issued
    }

    /// The zoom window for the mode of `committed` if there is one, otherwise
    /// `committed` itself.
    pub fn effective_range(&self, committed: RangeSelection) -> RangeSelection {
        self.zoom_window(committed.mode()).unwrap_or(committed)
    }

    /// Start a fetch of `range` and return the ticket that identifies it.
    pub fn begin_fetch(&mut self, account_name: &str, range: RangeSelection) -> FetchTicket {
        let currency = self.currency;
        let slot = self.slot_mut(range.mode());
        slot.issued += 1;

        FetchTicket {
            account_name: account_name.to_owned(),
            currency,
            range,
            generation: slot.issued,
        }
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// Returns `false` and leaves the chart unchanged if a newer fetch has been
    /// started for the same mode. A failed fetch keeps the previous series.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<BalanceSeries, Error>,
    ) -> bool {
        let slot = self.slot_mut(ticket.range.mode());
        if ticket.generation != slot.issued {
            return false;
        }

        slot.settled = ticket.generation;
        match result {
            Ok(series) => {
                slot.loaded = Some(LoadedSeries {
                    range: ticket.range,
                    series,
                });
            }
            Err(error) => {
                tracing::error!(
                    "could not fetch {} balances for {} over {:?}: {error}",
                    ticket.currency,
                    ticket.account_name,
                    ticket.range
                );
            }
        }

        true
    }

    /// Narrow the chart to the window between the axis labels `start` and `end`.
    ///
    /// Block numbers set the block window and timestamps set the time window.
    /// Only the modes in `committed` are zoomed, and only to a window that lies
    /// inside the range currently shown for that mode and is narrower than it.
    pub fn zoom(
        &mut self,
        start: &str,
        end: &str,
        committed: &[RangeSelection],
        now: Instant,
    ) -> ZoomOutcome {
        let cooling_down = self
            .last_zoom
            .is_some_and(|last_zoom| now.saturating_duration_since(last_zoom) < self.cooldown);
        if cooling_down {
            return ZoomOutcome::CoolingDown;
        }

        let mut changed = Vec::new();

        for committed in committed {
            let window = match committed {
                RangeSelection::Block(_) => block_window(start, end),
                RangeSelection::Time(_) => time_window(start, end),
            };
            let shown = self.effective_range(*committed);
            let Some(window) = window.filter(|window| shown.contains(window) && *window != shown)
            else {
                continue;
            };

            self.slot_mut(committed.mode()).zoom = Some(window);
            changed.push(committed.mode());
        }

        if changed.is_empty() {
            return ZoomOutcome::Ignored;
        }

        self.last_zoom = Some(now);
        ZoomOutcome::Applied(changed)
    }

    /// Drop the zoom windows so that the committed ranges apply again.
    pub fn reset(&mut self) {
        self.block.zoom = None;
        self.time.zoom = None;
    }

    /// Forget everything about the previous query.
    pub fn clear(&mut self) {
        self.block.clear();
        self.time.clear();
        self.last_zoom = None;
    }
}

fn block_window(start: &str, end: &str) -> Option<RangeSelection> {
    let start = start.trim().parse().ok()?;
    let end = end.trim().parse().ok()?;

    BlockRange::new(start, end).ok().map(RangeSelection::Block)
}

fn time_window(start: &str, end: &str) -> Option<RangeSelection> {
    let start = parse_timestamp(start).ok()?;
    let end = parse_timestamp(end).ok()?;

    TimeRange::new(start, end).ok().map(RangeSelection::Time)
}
