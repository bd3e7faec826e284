//! Core simulation components.
//!
//! This module provides the fundamental types for reconstructing a blotter:
//! - `PriceBar` / `PriceSeries`: daily OHLC history of one asset.
//! - `WindowScanner`: forward lookahead used to decide fills and cancellations.
//! - `EntryLeg` / `ExitLeg`: the buy and sell halves of the trading rule.
//! - `Blotter`: both legs merged under one trade id per round trip.
//! - `Simulation`: runs the whole pipeline for one asset and parameter set.

mod bar;
mod blotter;
mod entry;
mod exit;
mod order;
mod params;
mod series;
mod window;

use log::info;

use crate::calendar::TradingCalendar;
use crate::errors::Result;

pub use bar::*;
pub use blotter::*;
pub use entry::*;
pub use exit::*;
pub use order::*;
pub use params::*;
pub use series::*;
pub use window::*;

#[cfg(test)]
mod scenarios;

/// Every record produced by one leg, in the order the leg emitted them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegOrders {
    orders: Vec<Order>,
}

impl LegOrders {
    pub(crate) fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// Returns all the records.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Returns an iterator over the submission records.
    pub fn submitted(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.is_submitted())
    }

    /// Returns an iterator over the filled records (market liquidations included).
    pub fn filled(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.is_filled())
    }

    /// Returns an iterator over the cancelled records.
    pub fn cancelled(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.status() == OrderStatus::Cancelled)
    }

    /// Returns an iterator over the records still outstanding.
    pub fn live(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.is_live())
    }

    /// Consumes the leg and returns its records.
    pub fn into_orders(self) -> Vec<Order> {
        self.orders
    }
}

/// One run of the trading rule over the history of one asset.
#[derive(Debug, Clone)]
pub struct Simulation {
    series: PriceSeries,
    asset: String,
    params: StrategyParams,
    exit_leg: bool,
}

impl Simulation {
    /// Creates a new simulation.
    ///
    /// ### Arguments
    /// * `series` - Validated price history of the asset.
    /// * `asset` - Symbol written on every order.
    /// * `params` - Rule parameters, validated here.
    ///
    /// ### Returns
    /// The new simulation or a parameter error.
    pub fn new(series: PriceSeries, asset: impl Into<String>, params: StrategyParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            series,
            asset: asset.into(),
            params,
            exit_leg: true,
        })
    }

    /// Skips the exit leg: the blotter will only hold entry records.
    pub fn entry_only(mut self) -> Self {
        self.exit_leg = false;
        self
    }

    /// Returns the price history.
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    /// Returns the asset symbol.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Returns the parameters.
    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Runs both legs and assembles the blotter.
    ///
    /// `calendar` is only consulted when the entry leg ends with a live bid.
    ///
    /// ### Example
    /// ```rust
    /// use blotter_rs::prelude::*;
    /// use chrono::NaiveDate;
    /// use rust_decimal_macros::dec;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
    /// let series = PriceSeries::new(vec![
    ///     PriceBar::from((day(2), dec!(100.0), dec!(101.0), dec!(99.0), dec!(100.0))),
    ///     PriceBar::from((day(3), dec!(100.0), dec!(101.0), dec!(98.0), dec!(100.5))),
    ///     PriceBar::from((day(4), dec!(100.5), dec!(102.0), dec!(100.0), dec!(101.5))),
    ///     PriceBar::from((day(5), dec!(101.5), dec!(101.8), dec!(100.9), dec!(101.0))),
    /// ])
    /// .unwrap();
    ///
    /// let params = StrategyParams::new(dec!(-0.01), 2, dec!(0.01), 2).unwrap();
    /// let blotter = Simulation::new(series, "IVV", params)
    ///     .unwrap()
    ///     .run(&WeekdayCalendar::default())
    ///     .unwrap();
    ///
    /// assert_eq!(blotter.round_trip(1).count(), 4);
    /// ```
    pub fn run<C>(&self, calendar: &C) -> Result<Blotter>
    where
        C: TradingCalendar + ?Sized,
    {
        let entry = EntryLeg::new(self.params.alpha1, self.params.n1)?.simulate(&self.series, &self.asset, calendar)?;
        let exit = if self.exit_leg {
            let leg = ExitLeg::new(self.params.alpha2, self.params.n2)?;
            Some(leg.simulate(entry.filled(), &self.series, &self.asset)?)
        } else {
            None
        };

        let blotter = Blotter::assemble(entry, exit);
        info!(
            "simulated {} over {} bars: {} orders, {} round trips, {} live",
            self.asset,
            self.series.len(),
            blotter.len(),
            blotter.trade_ids().len(),
            blotter.live().count()
        );
        Ok(blotter)
    }
}
