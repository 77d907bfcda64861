//! Turns the search form into validated, normalized request parameters.

mod form;
mod range;
mod timestamp;

pub use form::{ActiveQuery, QueryForm};
pub use range::{BlockRange, RangeSelection, TimeRange};
pub use timestamp::{format_datetime_local, format_rpc_timestamp, parse_timestamp};
