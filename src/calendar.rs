//! Outside collaborators: trading calendars and price history providers.
//!
//! The simulation never fetches anything itself. Price history is resolved
//! into a [`PriceSeries`] before a run starts, and the calendar is asked for a
//! single date when the last bids are still live.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::engine::PriceSeries;
use crate::errors::{Error, Result};

/// Answers "which day does the market open next?".
pub trait TradingCalendar {
    /// Returns the first trading day strictly after `after`.
    fn next_trading_day(&self, after: NaiveDate) -> Result<NaiveDate>;
}

/// Supplies daily bars for an asset.
pub trait PriceHistory {
    /// Returns the validated history of `asset` within `[start, end]`.
    fn price_history(&self, asset: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

/// Monday to Friday, minus an optional set of holidays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendar {
    /// Creates a calendar closed on weekends and on `holidays`.
    pub fn with_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Returns `true` if the market is open on `date`.
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}

impl TradingCalendar for WeekdayCalendar {
    fn next_trading_day(&self, after: NaiveDate) -> Result<NaiveDate> {
        let mut date = after;
        // a year of closed days means the holiday set is broken
        for _ in 0..366 {
            date = date
                .succ_opt()
                .ok_or_else(|| Error::Calendar(format!("no date after {date}")))?;
            if self.is_trading_day(date) {
                return Ok(date);
            }
        }
        Err(Error::Calendar(format!("no trading day within a year after {after}")))
    }
}

/// Always answers with the same date, e.g. a value fetched ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCalendar {
    date: NaiveDate,
}

impl FixedCalendar {
    /// Creates a calendar answering `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl TradingCalendar for FixedCalendar {
    fn next_trading_day(&self, _after: NaiveDate) -> Result<NaiveDate> {
        Ok(self.date)
    }
}

impl PriceHistory for HashMap<String, PriceSeries> {
    fn price_history(&self, asset: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        self.get(asset)
            .ok_or_else(|| Error::PriceHistory(format!("no history for {asset}")))?
            .between(start, end)
    }
}
