use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::{Error, Result};

use super::PriceBar;

/// Date-sorted daily price history for one asset.
///
/// The position of a bar in the series is its trading-day offset, so every
/// lookahead window is expressed in bar indices rather than calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validates and wraps the bars returned by a price history provider.
    ///
    /// ### Errors
    /// * [`Error::EmptyPriceSeries`] if `bars` is empty.
    /// * [`Error::NotEnoughBars`] if there is a single bar.
    /// * [`Error::DuplicateDate`] / [`Error::UnsortedDates`] if dates are not strictly increasing.
    /// * [`Error::InvalidBar`] if a bar carries unusable prices.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(Error::EmptyPriceSeries);
        }
        if bars.len() < 2 {
            return Err(Error::NotEnoughBars(bars.len()));
        }

        for pair in bars.windows(2) {
            let (previous, current) = (pair[0].date(), pair[1].date());
            if previous == current {
                return Err(Error::DuplicateDate(current));
            }
            if previous > current {
                return Err(Error::UnsortedDates { previous, current });
            }
        }
        bars.iter().try_for_each(PriceBar::validate)?;

        Ok(Self { bars })
    }

    /// Returns the number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns `true` if there are no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the bar at `index`.
    pub fn get(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    /// Returns an iterator over the bars.
    pub fn bars(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }

    /// Returns the date of the bar at `index`.
    pub(crate) fn date(&self, index: usize) -> NaiveDate {
        self.bars[index].date()
    }

    /// Returns the last bar of the series.
    pub fn last(&self) -> &PriceBar {
        // non-empty by construction
        &self.bars[self.bars.len() - 1]
    }

    /// Returns the first date of the series.
    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date()
    }

    /// Returns the last date of the series.
    pub fn last_date(&self) -> NaiveDate {
        self.last().date()
    }

    /// Finds the index of the bar dated `date`.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, PriceBar::date).ok()
    }

    /// Returns the daily lows in series order.
    pub fn lows(&self) -> Vec<Decimal> {
        self.bars.iter().map(PriceBar::low).collect()
    }

    /// Returns the daily highs in series order.
    pub fn highs(&self) -> Vec<Decimal> {
        self.bars.iter().map(PriceBar::high).collect()
    }

    /// Returns the daily closes in series order.
    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(PriceBar::close).collect()
    }

    /// Keeps only the bars dated within `[start, end]`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let bars = self
            .bars
            .iter()
            .filter(|bar| bar.date() >= start && bar.date() <= end)
            .copied()
            .collect();
        Self::new(bars)
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = Error;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self> {
        Self::new(bars)
    }
}
