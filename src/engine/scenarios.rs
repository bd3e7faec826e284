use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::calendar::{FixedCalendar, TradingCalendar, WeekdayCalendar};
use crate::errors::Error;

fn first_day() -> NaiveDate {
    // Monday
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

/// Builds a series on consecutive weekdays from `(open, high, low, close)` rows.
fn series(rows: &[(Decimal, Decimal, Decimal, Decimal)]) -> PriceSeries {
    let calendar = WeekdayCalendar::default();
    let mut date = first_day();
    let mut bars = Vec::with_capacity(rows.len());
    for &(open, high, low, close) in rows {
        bars.push(PriceBar::from((date, open, high, low, close)));
        date = calendar.next_trading_day(date).unwrap();
    }
    PriceSeries::new(bars).unwrap()
}

/// Random walk quoted in whole cents.
fn random_series(seed: u64, len: usize) -> PriceSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut close: i64 = 10_000;
    let rows: Vec<_> = (0..len)
        .map(|_| {
            let open = close;
            close = (open + rng.random_range(-200..=200)).max(1_000);
            let high = open.max(close) + rng.random_range(0..=100);
            let low = open.min(close) - rng.random_range(0..=100);
            let cents = |c: i64| Decimal::new(c, 2);
            (cents(open), cents(high), cents(low), cents(close))
        })
        .collect();
    series(&rows)
}

/// Offsets drawn in basis points.
fn random_params(seed: u64) -> StrategyParams {
    let mut rng = StdRng::seed_from_u64(seed);
    StrategyParams::new(
        Decimal::new(rng.random_range(-200..100), 4),
        rng.random_range(1..6),
        Decimal::new(rng.random_range(-50..200), 4),
        rng.random_range(1..8),
    )
    .unwrap()
}

fn run(series: &PriceSeries, params: StrategyParams) -> Blotter {
    Simulation::new(series.clone(), "IVV", params)
        .unwrap()
        .run(&WeekdayCalendar::default())
        .unwrap()
}

fn submission(blotter: &Blotter, trade_id: u64, trip: Trip) -> Option<&Order> {
    blotter
        .iter()
        .find(|o| o.trade_id() == trade_id && o.trip() == trip && o.is_submitted())
}

#[test]
fn scenario_a_bid_fills_on_its_first_day() {
    // closes 10, 11, 9, 12, 13; low on day 2 is 9
    let series = series(&[
        (dec!(10.0), dec!(10.5), dec!(9.5), dec!(10.0)),
        (dec!(10.0), dec!(11.5), dec!(9.0), dec!(11.0)),
        (dec!(11.0), dec!(11.0), dec!(8.5), dec!(9.0)),
        (dec!(9.0), dec!(12.5), dec!(9.0), dec!(12.0)),
        (dec!(12.0), dec!(13.5), dec!(11.8), dec!(13.0)),
    ]);
    let params = StrategyParams::new(dec!(-0.1), 2, dec!(0.5), 2).unwrap();
    let blotter = run(&series, params);

    let bid = submission(&blotter, 1, Trip::Enter).unwrap();
    assert_eq!(bid.date(), series.date(1));
    assert_eq!(bid.price(), dec!(9.0));

    let filled = blotter
        .round_trip(1)
        .find(|o| o.trip() == Trip::Enter && o.is_filled())
        .unwrap();
    assert_eq!(filled.date(), series.date(1));
    assert_eq!(filled.price(), dec!(9.0));
}

#[test]
fn scenario_b_bid_below_every_low_is_cancelled_at_window_close() {
    let series = series(&[
        (dec!(10.0), dec!(10.5), dec!(9.5), dec!(10.0)),
        (dec!(10.0), dec!(10.6), dec!(9.6), dec!(10.1)),
        (dec!(10.1), dec!(10.7), dec!(9.7), dec!(10.2)),
        (dec!(10.2), dec!(10.8), dec!(9.8), dec!(10.3)),
        (dec!(10.3), dec!(10.9), dec!(9.9), dec!(10.4)),
    ]);
    let leg = EntryLeg::new(dec!(-0.2), 3)
        .unwrap()
        .simulate(&series, "IVV", &WeekdayCalendar::default())
        .unwrap();

    let cancelled: Vec<&Order> = leg.cancelled().collect();
    // bids 1 and 2 have full windows
    assert_eq!(cancelled.len(), 2);
    assert_eq!(cancelled[0].date(), series.date(3));
    assert_eq!(cancelled[1].date(), series.date(4));
    assert_eq!(leg.filled().count(), 0);
}

#[test]
fn scenario_c_truncated_window_stays_live_and_adds_next_day_bid() {
    let series = series(&[
        (dec!(10.0), dec!(10.5), dec!(9.5), dec!(10.0)),
        (dec!(10.0), dec!(10.6), dec!(9.6), dec!(10.1)),
        (dec!(10.1), dec!(10.7), dec!(9.7), dec!(10.2)),
        (dec!(10.2), dec!(10.8), dec!(9.8), dec!(10.3)),
        (dec!(10.3), dec!(10.9), dec!(9.9), dec!(10.4)),
    ]);
    let params = StrategyParams::new(dec!(-0.2), 10, dec!(0.01), 5).unwrap();
    let blotter = run(&series, params);

    // last bar is Friday 2023-01-06
    let next_day = NaiveDate::from_ymd_opt(2023, 1, 9).unwrap();
    let live: Vec<&Order> = blotter.live().collect();
    assert_eq!(live.len(), 5);
    assert!(live[..4].iter().all(|o| o.date() < next_day));

    let standing = live[4];
    assert_eq!(standing.date(), next_day);
    assert_eq!(standing.trade_id(), 5);
    assert_eq!(standing.kind(), OrderKind::Limit);
    assert_eq!(standing.price(), dec!(8.32));
    assert!(submission(&blotter, standing.trade_id(), Trip::Enter).is_none());
    assert_eq!(blotter.with_status(OrderStatus::Cancelled).count(), 0);
}

#[test]
fn scenario_d_unreached_offer_is_liquidated_at_market() {
    let series = series(&[
        (dec!(10.0), dec!(10.2), dec!(9.8), dec!(10.0)),
        (dec!(10.0), dec!(10.1), dec!(9.5), dec!(9.9)),
        (dec!(9.9), dec!(10.0), dec!(9.6), dec!(9.8)),
        (dec!(9.8), dec!(9.9), dec!(9.5), dec!(9.6)),
        (dec!(9.6), dec!(9.7), dec!(9.4), dec!(9.5)),
        (dec!(9.5), dec!(9.6), dec!(9.3), dec!(9.4)),
    ]);
    let params = StrategyParams::new(dec!(0), 1, dec!(0.1), 3).unwrap();
    let blotter = run(&series, params);

    let cancelled = blotter
        .iter()
        .find(|o| o.trip() == Trip::Exit && o.status() == OrderStatus::Cancelled)
        .unwrap();
    let market = blotter
        .iter()
        .find(|o| o.trade_id() == cancelled.trade_id() && o.kind() == OrderKind::Market)
        .unwrap();

    assert_eq!(market.status(), OrderStatus::Filled);
    assert_eq!(market.action(), Action::Sell);
    assert_eq!(market.trip(), Trip::Exit);
    assert_eq!(market.date(), cancelled.date());
    let close = series.get(series.index_of(cancelled.date()).unwrap()).unwrap().close();
    assert_eq!(market.price(), close);
}

#[test]
fn limits_touched_exactly_fill_on_both_legs() {
    // bid 10.00 * 0.93 = 9.30, offer 9.30 * 1.07 = 9.951
    let series = series(&[
        (dec!(10.00), dec!(10.10), dec!(9.90), dec!(10.00)),
        (dec!(9.80), dec!(9.951), dec!(9.30), dec!(9.60)),
    ]);
    let params = StrategyParams::new(dec!(-0.07), 1, dec!(0.07), 1).unwrap();
    let blotter = run(&series, params);

    let rows: Vec<(Trip, OrderStatus, Decimal)> = blotter.iter().map(|o| (o.trip(), o.status(), o.price())).collect();
    assert_eq!(
        rows,
        vec![
            (Trip::Enter, OrderStatus::Submitted, dec!(9.30)),
            (Trip::Enter, OrderStatus::Filled, dec!(9.30)),
            (Trip::Exit, OrderStatus::Submitted, dec!(9.951)),
            (Trip::Exit, OrderStatus::Filled, dec!(9.951)),
        ]
    );
}

#[test]
fn exit_orders_are_only_built_from_filled_entries() {
    let series = random_series(3, 60);
    let blotter = run(&series, StrategyParams::default());

    for exit in blotter.with_trip(Trip::Exit).filter(|o| o.is_submitted()) {
        let filled_entry = blotter
            .round_trip(exit.trade_id())
            .find(|o| o.trip() == Trip::Enter && o.is_filled())
            .unwrap();
        assert_eq!(exit.date(), filled_entry.date());
    }
}

#[test]
fn every_submission_resolves_exactly_once() {
    for seed in 0..20 {
        let series = random_series(seed, 40);
        let params = random_params(seed + 100);
        let entry = EntryLeg::new(params.alpha1, params.n1)
            .unwrap()
            .simulate(&series, "IVV", &WeekdayCalendar::default())
            .unwrap();
        let exit = ExitLeg::new(params.alpha2, params.n2)
            .unwrap()
            .simulate(entry.filled(), &series, "IVV")
            .unwrap();

        for leg in [&entry, &exit] {
            for submitted in leg.submitted() {
                let resolutions = leg
                    .orders()
                    .iter()
                    .filter(|o| o.trade_id() == submitted.trade_id())
                    .filter(|o| !o.is_submitted() && o.kind() == OrderKind::Limit)
                    .count();
                assert_eq!(resolutions, 1, "seed {seed}, order {}", submitted.trade_id());
            }
        }
        assert_eq!(entry.submitted().count(), series.len() - 1);
    }
}

#[test]
fn runs_are_deterministic() {
    let series = random_series(11, 80);
    let params = random_params(12);
    let first = run(&series, params);
    let second = run(&series, params);
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());

    #[cfg(feature = "serde")]
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn every_filled_entry_has_one_exit_on_or_after_its_fill() {
    for seed in 0..20 {
        let series = random_series(seed, 50);
        let blotter = run(&series, random_params(seed + 200));

        for entry in blotter.with_trip(Trip::Enter).filter(|o| o.is_filled()) {
            let exits: Vec<&Order> = blotter
                .round_trip(entry.trade_id())
                .filter(|o| o.trip() == Trip::Exit && o.is_submitted())
                .collect();
            assert_eq!(exits.len(), 1, "seed {seed}");
            assert!(exits[0].date() >= entry.date());
        }
    }
}

#[test]
fn entry_only_runs_have_no_exit_records() {
    let series = random_series(5, 50);
    let blotter = Simulation::new(series, "IVV", StrategyParams::default())
        .unwrap()
        .entry_only()
        .run(&WeekdayCalendar::default())
        .unwrap();
    assert!(blotter.with_status(OrderStatus::Filled).count() > 0);
    assert_eq!(blotter.with_trip(Trip::Exit).count(), 0);
}

#[test]
fn cancellations_are_dated_at_window_close() {
    for seed in 0..20 {
        let series = random_series(seed, 50);
        let params = random_params(seed + 300);
        let blotter = run(&series, params);

        for cancelled in blotter.with_status(OrderStatus::Cancelled) {
            let submitted = submission(&blotter, cancelled.trade_id(), cancelled.trip()).unwrap();
            let window = match cancelled.trip() {
                Trip::Enter => params.n1,
                Trip::Exit => params.n2,
            };
            let start = series.index_of(submitted.date()).unwrap();
            assert_eq!(cancelled.date(), series.date(start + window - 1), "seed {seed}");
            if window > 1 {
                assert_ne!(cancelled.date(), submitted.date());
            }
        }
    }
}

#[test]
fn one_trade_id_per_round_trip() {
    for seed in 0..20 {
        let series = random_series(seed, 50);
        let blotter = run(&series, random_params(seed + 400));

        // trade id -> (entry submissions, exit submissions)
        let mut groups: BTreeMap<u64, (usize, usize)> = BTreeMap::new();
        for order in blotter.iter().filter(|o| o.is_submitted()) {
            let group = groups.entry(order.trade_id()).or_default();
            match order.trip() {
                Trip::Enter => group.0 += 1,
                Trip::Exit => group.1 += 1,
            }
        }
        for (id, (entries, exits)) in &groups {
            assert_eq!(*entries, 1, "seed {seed}, trade {id}");
            assert!(*exits <= 1, "seed {seed}, trade {id}");
        }

        // ids are 1..=K in submission order
        let ids: Vec<u64> = groups.keys().copied().collect();
        assert_eq!(ids, (1..=ids.len() as u64).collect::<Vec<_>>());
        let dates: Vec<NaiveDate> = ids
            .iter()
            .map(|id| submission(&blotter, *id, Trip::Enter).unwrap().date())
            .collect();
        assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]), "seed {seed}");

        // every record belongs to a known round trip or the standing bid after it
        let standing = ids.len() as u64 + 1;
        assert!(blotter.iter().all(|o| groups.contains_key(&o.trade_id()) || o.trade_id() == standing));
    }
}

#[test]
fn blotter_is_chronological() {
    let series = random_series(21, 70);
    let blotter = run(&series, random_params(22));
    let keys: Vec<(NaiveDate, u64)> = blotter.iter().map(|o| (o.date(), o.trade_id())).collect();
    assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn live_exits_are_reported_on_the_last_bar() {
    for seed in 0..20 {
        let series = random_series(seed, 30);
        let blotter = run(&series, random_params(seed + 500));
        for live in blotter.live().filter(|o| o.trip() == Trip::Exit) {
            assert_eq!(live.date(), series.last_date());
        }
    }
}

#[test]
fn validation_happens_before_any_output() {
    let params = StrategyParams { n2: 0, ..StrategyParams::default() };
    let result = Simulation::new(random_series(1, 10), "IVV", params);
    assert!(matches!(result, Err(Error::InvalidWindow { name: "n2", .. })));

    let one_bar = vec![PriceBar::from((first_day(), Decimal::ONE, Decimal::ONE, Decimal::ONE, Decimal::ONE))];
    let err = PriceSeries::new(one_bar).unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn calendar_failure_is_propagated() {
    struct Closed;
    impl TradingCalendar for Closed {
        fn next_trading_day(&self, _after: NaiveDate) -> crate::errors::Result<NaiveDate> {
            Err(Error::Calendar("calendar service unavailable".into()))
        }
    }

    // the last bids cannot resolve within a window this long
    let params = StrategyParams::new(dec!(-0.5), 5, dec!(0.01), 5).unwrap();
    let result = Simulation::new(random_series(2, 10), "IVV", params).unwrap().run(&Closed);
    assert!(matches!(result, Err(Error::Calendar(_))));

    let fixed = Simulation::new(random_series(2, 10), "IVV", params)
        .unwrap()
        .run(&FixedCalendar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
    assert!(fixed.is_ok());
}
