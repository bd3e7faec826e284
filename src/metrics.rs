//! Blotter statistics.
//!
//! This module provides tools to summarise a blotter:
//! - Order counts per leg and status
//! - Realized return of each closed round trip
//! - Win rate and average return
//!
//! It needs to enable `metrics` feature to use it.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

use crate::OffsetCalculus;
use crate::engine::*;

/// Record counts for one leg of the blotter.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegCounts {
    /// Submission records.
    pub submitted: usize,
    /// Limit orders that executed.
    pub filled: usize,
    /// Limit orders that expired unfilled.
    pub cancelled: usize,
    /// Orders still outstanding at the end of the data.
    pub live: usize,
    /// Market liquidations.
    pub market: usize,
}

impl LegCounts {
    fn count(&mut self, order: &Order) {
        match (order.status(), order.kind()) {
            (OrderStatus::Submitted, _) => self.submitted += 1,
            (OrderStatus::Filled, OrderKind::Market) => self.market += 1,
            (OrderStatus::Filled, OrderKind::Limit) => self.filled += 1,
            (OrderStatus::Cancelled, _) => self.cancelled += 1,
            (OrderStatus::Live, _) => self.live += 1,
        }
    }
}

/// A round trip whose entry and exit both executed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedTrip {
    /// Blotter trade id.
    pub trade_id: u64,
    /// Entry fill price.
    pub entry_price: Decimal,
    /// Exit fill price (limit or market).
    pub exit_price: Decimal,
    /// `exit_price / entry_price - 1`.
    pub realized: Decimal,
}

/// Summary statistics computed from a [`Blotter`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    entry: LegCounts,
    exit: LegCounts,
    closed: Vec<ClosedTrip>,
    open_positions: usize,
}

impl From<&Blotter> for Metrics {
    fn from(blotter: &Blotter) -> Self {
        let mut metrics = Self::default();
        // trade id -> (entry fill, exit fill)
        let mut trips: BTreeMap<u64, (Option<Decimal>, Option<Decimal>)> = BTreeMap::new();

        for order in blotter {
            match order.trip() {
                Trip::Enter => metrics.entry.count(order),
                Trip::Exit => metrics.exit.count(order),
            }
            if order.is_filled() {
                let trip = trips.entry(order.trade_id()).or_default();
                match order.trip() {
                    Trip::Enter => trip.0 = Some(order.price()),
                    Trip::Exit => trip.1 = Some(order.price()),
                }
            }
        }

        for (trade_id, fills) in trips {
            match fills {
                (Some(entry_price), Some(exit_price)) => metrics.closed.push(ClosedTrip {
                    trade_id,
                    entry_price,
                    exit_price,
                    realized: entry_price.change(exit_price),
                }),
                (Some(_), None) => metrics.open_positions += 1,
                _ => {}
            }
        }

        metrics
    }
}

impl Metrics {
    /// Returns the entry leg counts.
    pub fn entry(&self) -> &LegCounts {
        &self.entry
    }

    /// Returns the exit leg counts.
    pub fn exit(&self) -> &LegCounts {
        &self.exit
    }

    /// Returns the closed round trips, by trade id.
    pub fn closed_trips(&self) -> std::slice::Iter<'_, ClosedTrip> {
        self.closed.iter()
    }

    /// Returns the number of filled entries with no executed exit yet.
    pub fn open_positions(&self) -> usize {
        self.open_positions
    }

    /// Computes the win rate as a percentage of closed round trips.
    pub fn win_rate(&self) -> f64 {
        if self.closed.is_empty() {
            return 0.0;
        }
        let winning = self.closed.iter().filter(|t| t.realized > Decimal::ZERO).count();
        (winning as f64 / self.closed.len() as f64) * 100.0
    }

    /// Computes the mean realized return of closed round trips, as a fraction.
    pub fn average_return(&self) -> Decimal {
        if self.closed.is_empty() {
            return Decimal::ZERO;
        }
        self.closed.iter().map(|t| t.realized).sum::<Decimal>() / Decimal::from(self.closed.len())
    }

    /// Computes the compounded return of trading every closed round trip in turn.
    pub fn compounded_return(&self) -> Decimal {
        self.closed.iter().fold(Decimal::ONE, |acc, t| acc * (Decimal::ONE + t.realized)) - Decimal::ONE
    }
}

impl fmt::Display for LegCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "submitted {}, filled {}, cancelled {}, live {}, market {}",
            self.submitted, self.filled, self.cancelled, self.live, self.market
        )
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Blotter Metrics ===")?;
        writeln!(f, "Entries: {}", self.entry)?;
        writeln!(f, "Exits: {}", self.exit)?;
        #[allow(clippy::writeln_empty_string)]
        writeln!(f, "")?;
        writeln!(f, "Closed Round Trips: {}", self.closed.len())?;
        writeln!(f, "Open Positions: {}", self.open_positions)?;
        writeln!(f, "Win Rate: {:.2}%", self.win_rate())?;
        writeln!(f, "Average Return: {:.4}%", self.average_return() * Decimal::ONE_HUNDRED)?;
        writeln!(f, "Compounded Return: {:.4}%", self.compounded_return() * Decimal::ONE_HUNDRED)
    }
}
