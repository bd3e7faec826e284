use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::{Error, Result};

/// One trading day of open/high/low/close prices.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    date: NaiveDate,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
}

impl From<(NaiveDate, Decimal, Decimal, Decimal, Decimal)> for PriceBar {
    fn from((date, open, high, low, close): (NaiveDate, Decimal, Decimal, Decimal, Decimal)) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }
}

impl PriceBar {
    /// Returns the trading day.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the opening price.
    pub fn open(&self) -> Decimal {
        self.open
    }

    /// Returns the highest price of the day.
    pub fn high(&self) -> Decimal {
        self.high
    }

    /// Returns the lowest price of the day.
    pub fn low(&self) -> Decimal {
        self.low
    }

    /// Returns the closing price.
    pub fn close(&self) -> Decimal {
        self.close
    }

    /// Checks that every price is positive and that `high >= low`.
    pub(crate) fn validate(&self) -> Result<()> {
        let prices = [("open", self.open), ("high", self.high), ("low", self.low), ("close", self.close)];
        for (name, price) in prices {
            if price <= Decimal::ZERO {
                return Err(Error::InvalidBar {
                    date: self.date,
                    reason: format!("{name} price must be positive (got: {price})"),
                });
            }
        }
        if self.high < self.low {
            return Err(Error::InvalidBar {
                date: self.date,
                reason: format!("high {} is below low {}", self.high, self.low),
            });
        }
        Ok(())
    }
}
