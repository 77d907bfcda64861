//! Balance series as returned by the backend, keyed by block or by time.

use time::PrimitiveDateTime;

use crate::{
    Error,
    query::{RangeSelection, format_rpc_timestamp, parse_timestamp},
};

/// Where on the x axis a balance was sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Block(u64),
    Time(PrimitiveDateTime),
}

impl Position {
    /// The axis label for this position.
    ///
    /// Time labels use the backend timestamp format so that labels reported by
    /// a zoom gesture can be parsed back with [parse_timestamp].
    pub fn label(&self) -> String {
        match self {
            Position::Block(block) => block.to_string(),
            Position::Time(timestamp) => {
                format_rpc_timestamp(timestamp).unwrap_or_else(|_| timestamp.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalancePoint {
    pub position: Position,
    pub balance: f64,
}

/// An ordered sequence of balances for one account, currency and range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSeries {
    points: Vec<BalancePoint>,
}

impl BalanceSeries {
    pub fn new(points: Vec<BalancePoint>) -> Self {
        Self { points }
    }

    /// Build a block-keyed series from the parallel arrays of a backend response.
    ///
    /// Missing arrays count as empty and missing or null balances count as zero.
    pub fn from_blocks(blocks: Option<Vec<u64>>, balances: Option<Vec<Option<f64>>>) -> Self {
        let positions = blocks.unwrap_or_default().into_iter().map(Position::Block);

        Self::zip(positions, balances)
    }

    /// Build a time-keyed series from the parallel arrays of a backend response.
    ///
    /// # Errors
    /// Returns [Error::Decode] if a timestamp is not in a recognised format.
    pub fn from_times(
        times: Option<Vec<String>>,
        balances: Option<Vec<Option<f64>>>,
    ) -> Result<Self, Error> {
        let positions = times
            .unwrap_or_default()
            .iter()
            .map(|text| {
                parse_timestamp(text)
                    .map(Position::Time)
                    .map_err(|error| Error::Decode(error.to_string()))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self::zip(positions.into_iter(), balances))
    }

    fn zip(
        positions: impl Iterator<Item = Position>,
        balances: Option<Vec<Option<f64>>>,
    ) -> Self {
        let mut balances = balances.unwrap_or_default().into_iter();
        let points = positions
            .map(|position| BalancePoint {
                position,
                balance: balances.next().flatten().unwrap_or(0.0),
            })
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[BalancePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// This series, or a flat zero line across `range` if the series has no points.
    pub fn or_flat_zero(&self, range: &RangeSelection) -> BalanceSeries {
        if !self.is_empty() {
            return self.clone();
        }

        flat_zero(range)
    }

    /// The axis labels and balances as parallel vectors for plotting.
    pub fn labels_and_values(&self) -> (Vec<String>, Vec<f64>) {
        self.points
            .iter()
            .map(|point| (point.position.label(), point.balance))
            .unzip()
    }
}

/// A zero balance at both ends of `range`.
pub fn flat_zero(range: &RangeSelection) -> BalanceSeries {
    let (start, end) = match range {
        RangeSelection::Block(blocks) => (
            Position::Block(blocks.start()),
            Position::Block(blocks.end()),
        ),
        RangeSelection::Time(times) => {
            (Position::Time(times.start()), Position::Time(times.end()))
        }
    };

    BalanceSeries::new(vec![
        BalancePoint {
            position: start,
            balance: 0.0,
        },
        BalancePoint {
            position: end,
            balance: 0.0,
        },
    ])
}
