//! The query form and the committed query it produces.
//!
//! Form fields are only "typing" state. Nothing is fetched until the form is
//! submitted and [QueryForm::commit] turns it into an [ActiveQuery].

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::{
    Error,
    account_search::MatchList,
    currency::CurrencyCode,
    display_mode::DisplayMode,
    query::{
        range::{BlockRange, RangeSelection, TimeRange},
        timestamp::parse_timestamp,
    },
};

/// The raw fields of the query form, exactly as submitted.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub currencies: Vec<CurrencyCode>,
    #[serde(default)]
    pub start_block: String,
    #[serde(default)]
    pub end_block: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

/// The query that charts are fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuery {
    pub account_name: String,
    pub currencies: BTreeSet<CurrencyCode>,
    pub block_range: Option<BlockRange>,
    pub time_range: Option<TimeRange>,
}

impl ActiveQuery {
    /// The committed range for `mode`, if one was given.
    pub fn range_for(&self, mode: DisplayMode) -> Option<RangeSelection> {
        match mode {
            DisplayMode::Block => self.block_range.map(RangeSelection::Block),
            DisplayMode::Time => self.time_range.map(RangeSelection::Time),
        }
    }

    /// Every committed range, block range first.
    pub fn ranges(&self) -> Vec<RangeSelection> {
        [DisplayMode::Block, DisplayMode::Time]
            .into_iter()
            .filter_map(|mode| self.range_for(mode))
            .collect()
    }
}

/// Drop every character that is not an ASCII digit.
///
/// Block number inputs are filtered rather than rejected, e.g. "1,000" becomes
/// "1000".
pub fn filter_digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

impl QueryForm {
    /// Validate the form and turn it into the query to fetch charts for.
    ///
    /// # Errors
    /// - [Error::UnknownAccount] if `account_name` is not exactly one of `matches`.
    /// - [Error::NoCurrencySelected] if no currency was ticked.
    /// - [Error::IncompleteRange] if only one bound of a range was given.
    /// - [Error::NoRangeSelected] if neither range is complete.
    /// - [Error::InvalidRange] if a range does not have `start < end`.
    /// - [Error::InvalidBlockNumber] or [Error::InvalidTimestamp] if a bound
    ///   cannot be parsed.
    pub fn commit(&self, matches: &MatchList) -> Result<ActiveQuery, Error> {
        if !matches.contains(&self.account_name) {
            return Err(Error::UnknownAccount(self.account_name.clone()));
        }

        let currencies: BTreeSet<CurrencyCode> = self.currencies.iter().copied().collect();
        if currencies.is_empty() {
            return Err(Error::NoCurrencySelected);
        }

        let block_range = self.block_range()?;
        let time_range = self.time_range()?;
        if block_range.is_none() && time_range.is_none() {
            return Err(Error::NoRangeSelected);
        }

        Ok(ActiveQuery {
            account_name: self.account_name.clone(),
            currencies,
            block_range,
            time_range,
        })
    }

    fn block_range(&self) -> Result<Option<BlockRange>, Error> {
        let start = filter_digits(&self.start_block);
        let end = filter_digits(&self.end_block);

        match (start.is_empty(), end.is_empty()) {
            (true, true) => Ok(None),
            (false, false) => {
                let start = parse_block_number(&start)?;
                let end = parse_block_number(&end)?;
                BlockRange::new(start, end).map(Some)
            }
            _ => Err(Error::IncompleteRange("block")),
        }
    }

    fn time_range(&self) -> Result<Option<TimeRange>, Error> {
        let start = self.start_time.trim();
        let end = self.end_time.trim();

        match (start.is_empty(), end.is_empty()) {
            (true, true) => Ok(None),
            (false, false) => {
                TimeRange::new(parse_timestamp(start)?, parse_timestamp(end)?).map(Some)
            }
            _ => Err(Error::IncompleteRange("date")),
        }
    }
}

fn parse_block_number(digits: &str) -> Result<u64, Error> {
    digits
        .parse()
        .map_err(|_| Error::InvalidBlockNumber(digits.to_owned()))
}
