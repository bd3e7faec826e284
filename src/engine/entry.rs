use log::{debug, trace};
use rust_decimal::Decimal;

use crate::OffsetCalculus;
use crate::calendar::TradingCalendar;
use crate::errors::{Error, Result};

use super::params::{check_alpha, check_window};
use super::{LegOrders, Order, OrderKind, OrderStatus, PriceSeries, Trip, WindowOutcome, WindowScanner};

/// Buy-side leg: a limit bid every day, priced off the previous close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryLeg {
    alpha: Decimal,
    window: usize,
}

impl EntryLeg {
    /// Creates the entry leg with offset `alpha1` and window `n1`.
    ///
    /// ### Errors
    /// [`Error::InvalidWindow`] or [`Error::AlphaOutOfBounds`] on parameters
    /// [`StrategyParams`](super::StrategyParams) would reject.
    pub fn new(alpha: Decimal, window: usize) -> Result<Self> {
        check_window("n1", window)?;
        check_alpha("alpha1", alpha)?;
        Ok(Self { alpha, window })
    }

    /// Simulates the entry orders over `series`.
    ///
    /// The bid submitted on day `i` is `close[i - 1] * (1 + alpha1)` and is
    /// watched over lows `i..i + n1`. It fills on the first low at or under the
    /// bid, is cancelled on the last day of a full window that never got there,
    /// and stays live if the data ends first. When any bid is left live, the
    /// standing bid for the next trading day is appended, dated by `calendar`.
    ///
    /// ### Example
    /// ```rust
    /// use blotter_rs::prelude::*;
    /// use chrono::NaiveDate;
    /// use rust_decimal_macros::dec;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
    /// let series = PriceSeries::new(vec![
    ///     PriceBar::from((day(2), dec!(10.0), dec!(10.5), dec!(9.5), dec!(10.0))),
    ///     PriceBar::from((day(3), dec!(10.0), dec!(10.5), dec!(9.0), dec!(10.0))),
    /// ])
    /// .unwrap();
    ///
    /// let leg = EntryLeg::new(dec!(-0.1), 1)
    ///     .unwrap()
    ///     .simulate(&series, "IVV", &FixedCalendar::new(day(4)))
    ///     .unwrap();
    /// assert_eq!(leg.filled().count(), 1);
    /// ```
    pub fn simulate<C>(&self, series: &PriceSeries, asset: &str, calendar: &C) -> Result<LegOrders>
    where
        C: TradingCalendar + ?Sized,
    {
        let lows = series.lows();
        let scanner = WindowScanner::new(&lows, self.window)?;
        let mut orders = Vec::with_capacity(2 * series.len());
        let mut live = 0;

        for index in 1..series.len() {
            let reference = series.get(index - 1).ok_or(Error::BarNotFound(series.date(index)))?;
            let price = reference.close().offset(self.alpha);
            let submitted = Order::submitted(
                index as u64,
                series.date(index),
                asset,
                Trip::Enter,
                OrderKind::Limit,
                price,
            );

            let outcome = scanner.scan(index, |low| low <= price);
            trace!("entry {index} bid {price:.4} on {}: {outcome:?}", submitted.date());
            let resolved = match outcome {
                WindowOutcome::Touched(fill) => submitted.resolve(OrderStatus::Filled, series.date(fill)),
                WindowOutcome::NeverTouched(close) => submitted.resolve(OrderStatus::Cancelled, series.date(close)),
                WindowOutcome::Unresolved => {
                    live += 1;
                    submitted.resolve(OrderStatus::Live, submitted.date())
                }
            };

            orders.push(submitted);
            orders.push(resolved);
        }

        if live > 0 {
            let last_date = series.last_date();
            let date = calendar.next_trading_day(last_date)?;
            if date <= last_date {
                return Err(Error::Calendar(format!(
                    "next trading day after {last_date} resolved to {date}"
                )));
            }
            let price = series.last().close().offset(self.alpha);
            let standing = Order::submitted(series.len() as u64, date, asset, Trip::Enter, OrderKind::Limit, price);
            orders.push(standing.resolve(OrderStatus::Live, date));
        }

        let leg = LegOrders::new(orders);
        debug!(
            "entry leg for {asset}: {} submitted, {} filled, {} cancelled, {} live",
            leg.submitted().count(),
            leg.filled().count(),
            leg.cancelled().count(),
            leg.live().count()
        );
        Ok(leg)
    }
}
