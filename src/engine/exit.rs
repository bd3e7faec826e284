use log::{debug, trace};
use rust_decimal::Decimal;

use crate::OffsetCalculus;
use crate::errors::{Error, Result};

use super::params::{check_alpha, check_window};
use super::{LegOrders, Order, OrderKind, OrderStatus, PriceSeries, Trip, WindowOutcome, WindowScanner};

/// Sell-side leg: one limit offer per filled entry, priced off its fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitLeg {
    alpha: Decimal,
    window: usize,
}

impl ExitLeg {
    /// Creates the exit leg with offset `alpha2` and window `n2`.
    ///
    /// ### Errors
    /// [`Error::InvalidWindow`] if `window` is zero, [`Error::AlphaOutOfBounds`]
    /// if `alpha` is outside `[-1, 1]`.
    pub fn new(alpha: Decimal, window: usize) -> Result<Self> {
        check_window("n2", window)?;
        check_alpha("alpha2", alpha)?;
        Ok(Self { alpha, window })
    }

    /// Simulates the exit orders for the filled entries in `entries`.
    ///
    /// Each offer is submitted on its entry's fill day at `fill * (1 + alpha2)`
    /// and watched over highs starting on that same day. An offer the window
    /// never reaches is cancelled at window close and the position is sold at
    /// that day's close with a market order. An offer still open when the data
    /// ends is reported live as of the last bar.
    pub fn simulate<'a, I>(&self, entries: I, series: &PriceSeries, asset: &str) -> Result<LegOrders>
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut fills: Vec<&Order> = entries
            .into_iter()
            .filter(|o| o.trip() == Trip::Enter && o.is_filled())
            .collect();
        fills.sort_by_key(|o| (o.date(), o.trade_id()));

        let highs = series.highs();
        let scanner = WindowScanner::new(&highs, self.window)?;
        let mut orders = Vec::with_capacity(3 * fills.len());

        for entry in fills {
            let index = series.index_of(entry.date()).ok_or(Error::BarNotFound(entry.date()))?;
            let price = entry.price().offset(self.alpha);
            let submitted = Order::submitted(
                entry.trade_id(),
                entry.date(),
                asset,
                Trip::Exit,
                OrderKind::Limit,
                price,
            );

            let outcome = scanner.scan(index, |high| high >= price);
            trace!("exit {} offer {price:.4} on {}: {outcome:?}", entry.trade_id(), submitted.date());
            match outcome {
                WindowOutcome::Touched(fill) => {
                    let filled = submitted.resolve(OrderStatus::Filled, series.date(fill));
                    orders.push(submitted);
                    orders.push(filled);
                }
                WindowOutcome::NeverTouched(close) => {
                    let bar = series.get(close).ok_or(Error::BarNotFound(submitted.date()))?;
                    let cancelled = submitted.resolve(OrderStatus::Cancelled, bar.date());
                    let market = cancelled.liquidate(bar.date(), bar.close());
                    orders.push(submitted);
                    orders.push(cancelled);
                    orders.push(market);
                }
                WindowOutcome::Unresolved => {
                    let live = submitted.resolve(OrderStatus::Live, series.last_date());
                    orders.push(submitted);
                    orders.push(live);
                }
            }
        }

        let leg = LegOrders::new(orders);
        debug!(
            "exit leg for {asset}: {} submitted, {} filled, {} cancelled, {} live",
            leg.submitted().count(),
            leg.filled().count(),
            leg.cancelled().count(),
            leg.live().count()
        );
        Ok(leg)
    }
}
