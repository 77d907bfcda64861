//! Block and time ranges that bound a balance query.
//!
//! Both range types uphold `start < end`, which is checked on construction.

use time::PrimitiveDateTime;

use crate::{Error, display_mode::DisplayMode, query::timestamp::format_rpc_timestamp};

/// The approximate number of points the backend should return for a range.
const TARGET_POINT_COUNT: u64 = 1000;

/// A window of block numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    start: u64,
    end: u64,
}

impl BlockRange {
    /// Create a block range.
    ///
    /// # Errors
    /// Returns [Error::InvalidRange] if `start` is not less than `end`.
    pub fn new(start: u64, end: u64) -> Result<Self, Error> {
        if start >= end {
            return Err(Error::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// The block step that keeps the number of plotted points close to
    /// [TARGET_POINT_COUNT]: `max(1, round((end - start) / 1000))`, rounding
    /// halves up.
    pub fn increment(&self) -> u64 {
        let span = self.end - self.start;
        let rounds_up = span % TARGET_POINT_COUNT >= TARGET_POINT_COUNT / 2;

        (span / TARGET_POINT_COUNT + u64::from(rounds_up)).max(1)
    }
}

/// A window of calendar time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
}

impl TimeRange {
    /// Create a time range.
    ///
    /// # Errors
    /// Returns [Error::InvalidRange] if `start` is not before `end`.
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Result<Self, Error> {
        if start >= end {
            return Err(Error::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> PrimitiveDateTime {
        self.start
    }

    pub fn end(&self) -> PrimitiveDateTime {
        self.end
    }

    /// The bounds formatted the way the backend expects them.
    pub fn rpc_bounds(&self) -> Result<(String, String), Error> {
        Ok((
            format_rpc_timestamp(&self.start)?,
            format_rpc_timestamp(&self.end)?,
        ))
    }
}

/// The range a single balance series is fetched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelection {
    Block(BlockRange),
    Time(TimeRange),
}

impl RangeSelection {
    /// The display mode whose charts are keyed by this kind of range.
    pub fn mode(&self) -> DisplayMode {
        match self {
            RangeSelection::Block(_) => DisplayMode::Block,
            RangeSelection::Time(_) => DisplayMode::Time,
        }
    }

    /// Whether `other` is the same kind of range and lies within this one.
    pub fn contains(&self, other: &RangeSelection) -> bool {
        match (self, other) {
            (RangeSelection::Block(outer), RangeSelection::Block(inner)) => {
                outer.start <= inner.start && inner.end <= outer.end
            }
            (RangeSelection::Time(outer), RangeSelection::Time(inner)) => {
                outer.start <= inner.start && inner.end <= outer.end
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{Error, display_mode::DisplayMode};

    use super::{BlockRange, RangeSelection, TimeRange};

    #[test]
    fn increment_for_wide_range() {
        let range = BlockRange::new(1000, 5000).unwrap();

        assert_eq!(range.increment(), 4);
    }

    #[test]
    fn increment_floors_to_one() {
        let range = BlockRange::new(100, 900).unwrap();

        assert_eq!(range.increment(), 1);
    }

    #[test]
    fn increment_rounds_halves_up() {
        assert_eq!(BlockRange::new(0, 1499).unwrap().increment(), 1);
        assert_eq!(BlockRange::new(0, 1500).unwrap().increment(), 2);
        assert_eq!(BlockRange::new(0, 2499).unwrap().increment(), 2);
    }

    #[test]
    fn increment_of_tiny_range_is_one() {
        assert_eq!(BlockRange::new(7, 8).unwrap().increment(), 1);
    }

    #[test]
    fn increment_of_widest_range_does_not_overflow() {
        let range = BlockRange::new(0, u64::MAX).unwrap();

        assert_eq!(range.increment(), u64::MAX / 1000 + 1);
        assert_eq!(
            BlockRange::new(200, u64::MAX).unwrap().increment(),
            u64::MAX / 1000
        );
    }

    #[test]
    fn selection_contains_only_inner_ranges_of_its_kind() {
        let outer = RangeSelection::Block(BlockRange::new(1000, 5000).unwrap());

        assert!(outer.contains(&outer));
        assert!(outer.contains(&RangeSelection::Block(BlockRange::new(2000, 3000).unwrap())));
        assert!(!outer.contains(&RangeSelection::Block(BlockRange::new(0, 9_000_000).unwrap())));
        assert!(!outer.contains(&RangeSelection::Block(BlockRange::new(4000, 6000).unwrap())));
        assert!(!outer.contains(&RangeSelection::Time(
            TimeRange::new(datetime!(2021-01-01 00:00), datetime!(2021-01-02 00:00)).unwrap(),
        )));
    }

    #[test]
    fn block_range_rejects_reversed_and_empty_ranges() {
        assert_eq!(
            BlockRange::new(5000, 1000),
            Err(Error::InvalidRange {
                start: "5000".to_owned(),
                end: "1000".to_owned()
            })
        );
        assert!(BlockRange::new(10, 10).is_err());
    }

    #[test]
    fn time_range_rejects_reversed_range() {
        let result = TimeRange::new(datetime!(2021-02-01 00:00), datetime!(2021-01-01 00:00));

        assert!(matches!(result, Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn time_range_formats_bounds_for_backend() {
        let range =
            TimeRange::new(datetime!(2021-01-01 00:00), datetime!(2021-01-02 12:30:15)).unwrap();

        assert_eq!(
            range.rpc_bounds(),
            Ok((
                "2021 01 01 00:00:00".to_owned(),
                "2021 01 02 12:30:15".to_owned()
            ))
        );
    }

    #[test]
    fn selection_reports_its_mode() {
        let blocks = RangeSelection::Block(BlockRange::new(1, 2).unwrap());
        let times = RangeSelection::Time(
            TimeRange::new(datetime!(2021-01-01 00:00), datetime!(2021-01-02 00:00)).unwrap(),
        );

        assert_eq!(blocks.mode(), DisplayMode::Block);
        assert_eq!(times.mode(), DisplayMode::Time);
    }
}
