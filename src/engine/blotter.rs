//! Merging both legs into one blotter.
//!
//! Each leg numbers its orders locally: entries by their offset in the price
//! series, exits by the entry they close. Before the legs can share a table
//! those numbers are rewritten into one id per round trip, issued in the order
//! the submissions happened.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{LegOrders, Order, OrderStatus, Trip};

/// Mapping from each leg's local ids to the blotter's trade ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeIdMap {
    entry: BTreeMap<u64, u64>,
    exit: BTreeMap<u64, u64>,
}

impl TradeIdMap {
    /// Builds the mapping for the given legs.
    ///
    /// Submissions of both legs are sorted by `(date, local id, trip)`; walking
    /// that order, every round trip gets the next id the first time one of its
    /// submissions shows up. Records without a submission (the standing bid
    /// past the end of the data) are numbered after that, by date.
    pub fn build(entry: &LegOrders, exit: Option<&LegOrders>) -> Self {
        let mut submissions: Vec<&Order> = entry.submitted().collect();
        if let Some(exit) = exit {
            submissions.extend(exit.submitted());
        }
        submissions.sort_by_key(|o| (o.date(), o.trade_id(), o.trip()));

        let mut round_trips = BTreeMap::new();
        for order in &submissions {
            let next = round_trips.len() as u64 + 1;
            round_trips.entry(order.trade_id()).or_insert(next);
        }

        let mut map = Self::default();
        for order in &submissions {
            let id = round_trips[&order.trade_id()];
            map.table_mut(order.trip()).insert(order.trade_id(), id);
        }

        let mut next = round_trips.len() as u64;
        let mut unsubmitted: Vec<&Order> = entry.orders().iter().collect();
        if let Some(exit) = exit {
            unsubmitted.extend(exit.orders());
        }
        unsubmitted.retain(|o| !map.table(o.trip()).contains_key(&o.trade_id()));
        unsubmitted.sort_by_key(|o| (o.date(), o.trade_id(), o.trip()));
        for order in unsubmitted {
            if let Some(id) = round_trips.get(&order.trade_id()) {
                map.table_mut(order.trip()).insert(order.trade_id(), *id);
            } else {
                next += 1;
                round_trips.insert(order.trade_id(), next);
                map.table_mut(order.trip()).insert(order.trade_id(), next);
            }
        }

        map
    }

    fn table(&self, trip: Trip) -> &BTreeMap<u64, u64> {
        match trip {
            Trip::Enter => &self.entry,
            Trip::Exit => &self.exit,
        }
    }

    fn table_mut(&mut self, trip: Trip) -> &mut BTreeMap<u64, u64> {
        match trip {
            Trip::Enter => &mut self.entry,
            Trip::Exit => &mut self.exit,
        }
    }

    /// Returns the trade id of the entry leg's local id `local`.
    pub fn entry_id(&self, local: u64) -> Option<u64> {
        self.entry.get(&local).copied()
    }

    /// Returns the trade id of the exit leg's local id `local`.
    pub fn exit_id(&self, local: u64) -> Option<u64> {
        self.exit.get(&local).copied()
    }

    /// Rewrites `order` under its trade id; unmapped orders keep theirs.
    pub fn remap(&self, order: &Order) -> Order {
        match self.table(order.trip()).get(&order.trade_id()) {
            Some(id) => order.with_trade_id(*id),
            None => order.clone(),
        }
    }
}

/// The chronological record of every order the rule produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blotter {
    orders: Vec<Order>,
    ids: TradeIdMap,
}

impl Blotter {
    /// Merges the legs under one trade id per round trip, sorted by `(date, trade id)`.
    ///
    /// Records sharing a date and trade id keep the order their leg produced
    /// them in, entries before exits.
    pub fn assemble(entry: LegOrders, exit: Option<LegOrders>) -> Self {
        let ids = TradeIdMap::build(&entry, exit.as_ref());
        let mut orders: Vec<Order> = entry
            .orders()
            .iter()
            .chain(exit.iter().flat_map(LegOrders::orders))
            .map(|o| ids.remap(o))
            .collect();
        orders.sort_by_key(|o| (o.date(), o.trade_id(), o.trip()));
        Self { orders, ids }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns the records in blotter order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    /// Returns the id mapping used to build the blotter.
    pub fn trade_id_map(&self) -> &TradeIdMap {
        &self.ids
    }

    /// Returns the orders left outstanding at the end of the history.
    pub fn live(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.is_live())
    }

    /// Returns the records with the given status.
    pub fn with_status(&self, status: OrderStatus) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.status() == status)
    }

    /// Returns the records of one leg.
    pub fn with_trip(&self, trip: Trip) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.trip() == trip)
    }

    /// Returns every record of the round trip `trade_id`.
    pub fn round_trip(&self, trade_id: u64) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.trade_id() == trade_id)
    }

    /// Returns the distinct trade ids, ascending.
    pub fn trade_ids(&self) -> BTreeSet<u64> {
        self.orders.iter().map(Order::trade_id).collect()
    }

    /// Consumes the blotter and returns its records.
    pub fn into_orders(self) -> Vec<Order> {
        self.orders
    }
}

impl<'a> IntoIterator for &'a Blotter {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

impl fmt::Display for Blotter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>8}  {:<10}  {:<6}  {:<5}  {:<4}  {:<3}  {:>12}  {}",
            "trade_id", "date", "asset", "trip", "act", "typ", "price", "status"
        )?;
        for order in &self.orders {
            writeln!(f, "{order}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Blotter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.orders)
    }
}
