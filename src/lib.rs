//! # Blotter: order-lifecycle reconstruction for a limit-order rule
//!
//! **Blotter** replays a simple two-leg trading rule over daily OHLC history and
//! rebuilds every order it would have produced: what was submitted, what filled,
//! what was cancelled, and what is still standing when the data runs out.
//!
//! ## The rule
//! - **Entry**: every day, bid `previous close * (1 + alpha1)` with a limit buy.
//!   The bid fills on the first of the next `n1` days whose low reaches it,
//!   otherwise it is cancelled on the last of those days.
//! - **Exit**: for every filled bid, offer `fill * (1 + alpha2)` with a limit sell
//!   from the fill day on. It fills on the first of `n2` days whose high reaches
//!   it, otherwise it is cancelled and the position is sold at that day's close.
//! - Orders whose window is cut short by the end of the data stay **LIVE**.
//!
//! ## Core Components
//! | Component   | Description                                                                 |
//! |-------------|-----------------------------------------------------------------------------|
//! | **`PriceSeries`** | Validated, date-sorted OHLC history for one asset.                    |
//! | **`WindowScanner`** | Forward lookahead deciding first touch, cancellation or unresolved. |
//! | **`EntryLeg`** | Limit bids priced off the previous close.                                |
//! | **`ExitLeg`** | Limit offers priced off the entry fill, with market liquidation.          |
//! | **`Blotter`** | Both legs under one trade id per round trip, in chronological order.      |
//! | **`Simulation`** | Runs the whole pipeline for one asset and parameter set.               |
//! | **`Metrics`** | Counts per status, realized round-trip returns, win rate.                 |
//! | **`Optimizer`** | Parallel parameter sweeps.                                              |
//!
//! ## Getting Started
//! ```rust
//! use blotter_rs::prelude::*;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let day = |d| NaiveDate::from_ymd_opt(2023, 2, d).unwrap();
//!     let series = PriceSeries::new(vec![
//!         PriceBar::from((day(1), dec!(100.0), dec!(101.0), dec!(99.0), dec!(100.0))),
//!         PriceBar::from((day(2), dec!(100.0), dec!(101.5), dec!(98.5), dec!(101.0))),
//!         PriceBar::from((day(3), dec!(101.0), dec!(102.5), dec!(100.5), dec!(102.0))),
//!     ])
//!     .unwrap();
//!
//!     let blotter = Simulation::new(series, "IVV", StrategyParams::default())
//!         .unwrap()
//!         .run(&WeekdayCalendar::default())
//!         .unwrap();
//!
//!     println!("{blotter}");
//! }
//! ```
//!
//! ## Integrations
//! | Crate          | Purpose                                                       |
//! |----------------|---------------------------------------------------------------|
//! | [`rayon`](https://crates.io/crates/rayon) | Parallel parameter sweeps (`optimizer`). |
//! | [`serde`](https://crates.io/crates/serde) | JSON price files, parameters and blotter output (`serde`). |
//! | [`log`](https://crates.io/crates/log) | Run summaries and per-order tracing. |
//! | [`rust_decimal`](https://crates.io/crates/rust_decimal) | Exact decimal prices, so a bar touching a limit exactly fills it. |
//!
//! ## Error Handling
//! Inputs are validated before any order is produced:
//! - Empty, unsorted or duplicated price history, or fewer than two bars.
//! - Window lengths below one day, offsets outside `[-1, 1]`.
//! - Calendar or price provider failures, which are returned as they are.
//!
//! ## License
//! MIT
#![warn(missing_docs)]

/// Core simulation components: price history, orders, legs and blotter.
pub mod engine;

/// Error types for the library.
pub mod errors;

/// Trading calendars and price history providers.
pub mod calendar;

/// JSON price file loading.
#[cfg(feature = "serde")]
pub mod utils;

/// Blotter statistics: status counts, round-trip returns, win rate.
#[cfg(feature = "metrics")]
pub mod metrics;

/// Strategy parameter sweeps.
#[cfg(feature = "optimizer")]
pub mod optimizer;

/// Re-exports of commonly used types and traits for convenience.
pub mod prelude {
    pub use super::*;
    pub use crate::calendar::*;
    pub use crate::engine::*;
    pub use crate::errors::*;
    pub use rust_decimal::Decimal;

    #[cfg(feature = "serde")]
    pub use crate::utils::*;

    #[cfg(feature = "metrics")]
    pub use crate::metrics::*;

    #[cfg(feature = "optimizer")]
    pub use crate::optimizer::*;
}

use std::ops::{Add, Div, Mul, Sub};

use rust_decimal::Decimal;

/// Trait for fractional price offsets.
///
/// Offsets are plain fractions: `0.01` is one percent.
pub trait OffsetCalculus<Rhs = Self> {
    /// Applies a signed offset: `self * (1 + rhs)`.
    fn offset(self, rhs: Rhs) -> Self;

    /// Calculates the fractional change from `self` to `new`.
    fn change(self, new: Self) -> Self;
}

impl OffsetCalculus for Decimal {
    fn offset(self, fraction: Self) -> Self {
        self.mul(Decimal::ONE.add(fraction))
    }

    fn change(self, new: Self) -> Self {
        new.sub(self).div(self)
    }
}
