use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Which half of a round trip an order belongs to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Trip {
    /// Opening buy.
    Enter,
    /// Closing sell.
    Exit,
}

impl Trip {
    /// Returns the action an order on this leg takes (entries buy, exits sell).
    pub fn action(&self) -> Action {
        match self {
            Self::Enter => Action::Buy,
            Self::Exit => Action::Sell,
        }
    }
}

/// Represents the side of an order (buy or sell).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

/// Represents the type of an order (limit or market).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    /// Executes at the limit price or better.
    #[cfg_attr(feature = "serde", serde(rename = "LMT"))]
    Limit,
    /// Executes at the prevailing price.
    #[cfg_attr(feature = "serde", serde(rename = "MKT"))]
    Market,
}

/// Lifecycle state carried by an order record.
///
/// `Live` is not terminal: the order was still outstanding when the price
/// history ran out.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Placed on the market.
    Submitted,
    /// Executed.
    Filled,
    /// Expired at window close without executing.
    Cancelled,
    /// Still outstanding.
    Live,
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Enter => "ENTER",
            Self::Exit => "EXIT",
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        })
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Limit => "LMT",
            Self::Market => "MKT",
        })
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Submitted => "SUBMITTED",
            Self::Filled => "FILLED",
            Self::Cancelled => "CANCELLED",
            Self::Live => "LIVE",
        })
    }
}

/// One row of the blotter.
///
/// Records are never mutated once built: a status change produces a new
/// record that shares the trade id of the one it resolves.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    trade_id: u64,
    date: NaiveDate,
    asset: String,
    trip: Trip,
    action: Action,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    kind: OrderKind,
    price: Decimal,
    status: OrderStatus,
}

impl Order {
    /// Builds a freshly submitted order; the action follows from the trip.
    pub(crate) fn submitted(
        trade_id: u64,
        date: NaiveDate,
        asset: &str,
        trip: Trip,
        kind: OrderKind,
        price: Decimal,
    ) -> Self {
        Self {
            trade_id,
            date,
            asset: asset.to_owned(),
            trip,
            action: trip.action(),
            kind,
            price,
            status: OrderStatus::Submitted,
        }
    }

    /// Returns the record this order becomes once it reaches `status` on `date`.
    pub(crate) fn resolve(&self, status: OrderStatus, date: NaiveDate) -> Self {
        Self {
            status,
            date,
            ..self.clone()
        }
    }

    /// Returns a market order filled at `price` on `date` for the same trade.
    pub(crate) fn liquidate(&self, date: NaiveDate, price: Decimal) -> Self {
        Self {
            date,
            price,
            kind: OrderKind::Market,
            status: OrderStatus::Filled,
            ..self.clone()
        }
    }

    /// Returns the same record under another trade id.
    pub(crate) fn with_trade_id(&self, trade_id: u64) -> Self {
        Self {
            trade_id,
            ..self.clone()
        }
    }

    /// Returns the trade id.
    pub fn trade_id(&self) -> u64 {
        self.trade_id
    }

    /// Returns the date the record is reported on.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the asset symbol.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Returns the leg of the round trip.
    pub fn trip(&self) -> Trip {
        self.trip
    }

    /// Returns the order side.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the order type.
    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    /// Returns the limit price, or the execution price of a market order.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns `true` if this is a submission record.
    pub fn is_submitted(&self) -> bool {
        self.status == OrderStatus::Submitted
    }

    /// Returns `true` if this record reports an executed order.
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    /// Returns `true` if this order was still outstanding at the end of the data.
    pub fn is_live(&self) -> bool {
        self.status == OrderStatus::Live
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8}  {}  {:<6}  {:<5}  {:<4}  {:<3}  {:>12.4}  {}",
            self.trade_id, self.date, self.asset, self.trip, self.action, self.kind, self.price, self.status
        )
    }
}
