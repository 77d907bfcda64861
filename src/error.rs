//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The balance backend could not be reached or answered with a non-2xx status.
    ///
    /// The string holds the underlying error message for logging and should not
    /// be shown to the client.
    #[error("RPC call failed: {0}")]
    Rpc(String),

    /// The balance backend answered, but the body could not be decoded.
    #[error("could not decode RPC response: {0}")]
    Decode(String),

    /// A block or time range where the start is not strictly before the end.
    #[error("the range start {start} must be before the range end {end}")]
    InvalidRange {
        /// The formatted start of the range.
        start: String,
        /// The formatted end of the range.
        end: String,
    },

    /// Only one bound of a range was given.
    ///
    /// The string names the kind of range, e.g. "block".
    #[error("both the start and end of the {0} range must be given")]
    IncompleteRange(&'static str),

    /// A block number that does not fit in an unsigned 64-bit integer.
    #[error("\"{0}\" is not a valid block number")]
    InvalidBlockNumber(String),

    /// A date-time string that does not match any of the accepted formats.
    #[error("\"{0}\" is not a valid date and time")]
    InvalidTimestamp(String),

    /// The searched account name is not one of the names returned by the
    /// account search.
    #[error("the account \"{0}\" was not found in the search results")]
    UnknownAccount(String),

    /// The query form was submitted without any currency selected.
    #[error("no currency was selected")]
    NoCurrencySelected,

    /// The query form was submitted without a complete block or date range.
    #[error("no block or date range was given")]
    NoRangeSelected,

    /// A currency code outside of the supported set.
    #[error("{0} is not a supported currency code")]
    UnknownCurrency(u16),

    /// A chart action was requested before any query was submitted.
    #[error("no query has been submitted")]
    NoActiveQuery,

    /// Could not acquire the dashboard state lock.
    #[error("could not acquire the dashboard state lock")]
    StateLockError,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::UnknownCurrency(_) => NotFoundError.into_response(),
            Error::StateLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidRange { start, end } => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid range".to_owned(),
                    details: format!("The start ({start}) must come before the end ({end})."),
                },
            ),
            Error::IncompleteRange(kind) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Incomplete range".to_owned(),
                    details: format!("Enter both the start and the end of the {kind} range."),
                },
            ),
            Error::InvalidBlockNumber(text) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid block number".to_owned(),
                    details: format!("\"{text}\" is too large to be a block number."),
                },
            ),
            Error::InvalidTimestamp(text) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid date".to_owned(),
                    details: format!("Could not read \"{text}\" as a date and time."),
                },
            ),
            Error::UnknownAccount(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unknown account".to_owned(),
                    details: format!(
                        "No account named \"{name}\" was found. \
                        Pick one of the suggested accounts from the search box."
                    ),
                },
            ),
            Error::NoCurrencySelected => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No currency selected".to_owned(),
                    details: "Select at least one currency to chart.".to_owned(),
                },
            ),
            Error::NoRangeSelected => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No range given".to_owned(),
                    details: "Enter a start and end block, or a start and end date.".to_owned(),
                },
            ),
            Error::UnknownCurrency(code) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Unknown currency".to_owned(),
                    details: format!("There is no chart for the currency {code}."),
                },
            ),
            Error::NoActiveQuery => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Nothing to show".to_owned(),
                    details: "Search for an account and submit the form first.".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
