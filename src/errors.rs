use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a simulation from producing a blotter.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The price series provided is empty.
    #[error("Price series is empty: simulation requires at least two bars")]
    EmptyPriceSeries,

    /// The entry leg needs a prior-day close, so one bar is not enough.
    #[error("Price series has {0} bar(s): simulation requires at least two bars")]
    NotEnoughBars(usize),

    /// Bars are not in ascending date order.
    #[error("Price series is not sorted: {current} comes after {previous}")]
    UnsortedDates {
        /// Date of the earlier bar in the input.
        previous: NaiveDate,
        /// Date of the bar that breaks the ordering.
        current: NaiveDate,
    },

    /// Two bars share the same date.
    #[error("Price series contains duplicate date {0}")]
    DuplicateDate(NaiveDate),

    /// A bar carries prices that cannot be simulated against.
    #[error("Invalid bar on {date}: {reason}")]
    InvalidBar {
        /// Date of the offending bar.
        date: NaiveDate,
        /// What is wrong with it.
        reason: String,
    },

    /// A lookahead window length is below one trading day.
    #[error("Window length {name} must be at least 1 (got: {value})")]
    InvalidWindow {
        /// Parameter name (`n1` or `n2`).
        name: &'static str,
        /// Rejected value.
        value: usize,
    },

    /// A limit offset is outside `[-1, 1]`.
    #[error("Offset {name} must be a fraction in [-1, 1] (got: {value})")]
    AlphaOutOfBounds {
        /// Parameter name (`alpha1` or `alpha2`).
        name: &'static str,
        /// Rejected value.
        value: Decimal,
    },

    /// An order refers to a date that has no bar in the series.
    #[error("No bar found for date {0}")]
    BarNotFound(NaiveDate),

    /// The trading calendar could not answer.
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// The price history provider could not answer.
    #[error("Price history error: {0}")]
    PriceHistory(String),

    /// I/O error occurred.
    // utils.rs
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error occurred.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` when the price series itself was rejected.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPriceSeries
                | Self::NotEnoughBars(_)
                | Self::UnsortedDates { .. }
                | Self::DuplicateDate(_)
                | Self::InvalidBar { .. }
        )
    }

    /// Returns `true` when the strategy parameters were rejected.
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Self::InvalidWindow { .. } | Self::AlphaOutOfBounds { .. })
    }
}

#[cfg(test)]
#[test]
fn error_taxonomy() {
    assert!(Error::EmptyPriceSeries.is_input_error());
    assert!(Error::NotEnoughBars(1).is_input_error());
    assert!(!Error::NotEnoughBars(1).is_parameter_error());

    let err = Error::InvalidWindow { name: "n1", value: 0 };
    assert!(err.is_parameter_error());
    assert!(!err.is_input_error());
    assert_eq!(err.to_string(), "Window length n1 must be at least 1 (got: 0)");

    assert!(!Error::Calendar("down".into()).is_input_error());
}
