//! Parsing and formatting of the date-times exchanged with the browser and the
//! balance backend.

use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The format the backend expects for `_start_time` and `_end_time`, e.g.
/// "2021 03 04 05:06:07". Chart labels use it too so that zoom gestures report
/// bounds that parse back into the same instant.
const RPC_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year] [month] [day] [hour]:[minute]:[second]");

/// The value format of `datetime-local` inputs, also used in JSON by the backend.
const DATETIME_LOCAL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Accepted input formats, tried in order.
const INPUT_FORMATS: [&[BorrowedFormatItem]; 4] = [
    RPC_FORMAT,
    DATETIME_LOCAL_FORMAT,
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
];

pub fn format_rpc_timestamp(timestamp: &PrimitiveDateTime) -> Result<String, Error> {
    timestamp
        .format(RPC_FORMAT)
        .map_err(|error| Error::InvalidTimestamp(format!("{timestamp}: {error}")))
}

/// Format `timestamp` as the value of a `datetime-local` input.
pub fn format_datetime_local(timestamp: &PrimitiveDateTime) -> Result<String, Error> {
    timestamp
        .format(DATETIME_LOCAL_FORMAT)
        .map_err(|error| Error::InvalidTimestamp(format!("{timestamp}: {error}")))
}

/// Parse `text` as a date-time in any of the accepted formats.
///
/// Fractional seconds are dropped.
pub fn parse_timestamp(text: &str) -> Result<PrimitiveDateTime, Error> {
    let trimmed = text.trim();
    let without_fraction = trimmed.split('.').next().unwrap_or(trimmed);

    INPUT_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(without_fraction, *format).ok())
        .ok_or_else(|| Error::InvalidTimestamp(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{format_datetime_local, format_rpc_timestamp, parse_timestamp};

    #[test]
    fn formats_with_spaces_and_colons() {
        let formatted = format_rpc_timestamp(&datetime!(2021-03-04 05:06:07)).unwrap();

        assert_eq!(formatted, "2021 03 04 05:06:07");
    }

    #[test]
    fn datetime_local_value_parses_back() {
        let timestamp = datetime!(2021-03-04 05:06:07);

        let formatted = format_datetime_local(&timestamp).unwrap();

        assert_eq!(formatted, "2021-03-04T05:06:07");
        assert_eq!(parse_timestamp(&formatted), Ok(timestamp));
    }

    #[test]
    fn parses_accepted_formats() {
        let want = datetime!(2021-03-04 05:06:07);

        for text in [
            "2021 03 04 05:06:07",
            "2021-03-04T05:06:07",
            "2021-03-04 05:06:07",
            "2021-03-04T05:06:07.250",
            " 2021-03-04T05:06:07 ",
        ] {
            assert_eq!(parse_timestamp(text), Ok(want), "failed to parse {text:?}");
        }
    }

    #[test]
    fn parses_datetime_local_without_seconds() {
        assert_eq!(
            parse_timestamp("2021-03-04T05:06"),
            Ok(datetime!(2021-03-04 05:06:00))
        );
    }

    #[test]
    fn rejects_block_numbers() {
        assert_eq!(
            parse_timestamp("123456"),
            Err(Error::InvalidTimestamp("123456".to_owned()))
        );
    }
}
