//! Strategy parameter sweeps.
//!
//! Each parameter set is an independent simulation over the same history, so
//! the sweep runs them in parallel chunks. Results always come back in the
//! order the combinations were generated.

use crate::calendar::TradingCalendar;
use crate::engine::{Blotter, PriceSeries, Simulation, StrategyParams};
use crate::errors::Result;

use rayon::prelude::*;
use rust_decimal::Decimal;

/// Trait defining how to generate parameter combinations for a sweep.
pub trait ParameterCombination: Sync {
    /// Generates all parameter sets to test.
    fn generate(&self) -> Vec<StrategyParams>;
}

impl ParameterCombination for Vec<StrategyParams> {
    fn generate(&self) -> Vec<StrategyParams> {
        self.clone()
    }
}

/// Cartesian product of candidate values for each parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterGrid {
    /// Candidate entry offsets.
    pub alpha1: Vec<Decimal>,
    /// Candidate entry windows.
    pub n1: Vec<usize>,
    /// Candidate exit offsets.
    pub alpha2: Vec<Decimal>,
    /// Candidate exit windows.
    pub n2: Vec<usize>,
}

impl ParameterCombination for ParameterGrid {
    fn generate(&self) -> Vec<StrategyParams> {
        self.alpha1
            .iter()
            .flat_map(|&alpha1| {
                self.n1.iter().flat_map(move |&n1| {
                    self.alpha2.iter().flat_map(move |&alpha2| {
                        self.n2.iter().map(move |&n2| StrategyParams { alpha1, n1, alpha2, n2 })
                    })
                })
            })
            .collect()
    }
}

/// Runs one asset's history against many parameter sets.
#[derive(Debug, Clone)]
pub struct Optimizer {
    series: PriceSeries,
    asset: String,
}

impl Optimizer {
    /// Creates a new `Optimizer` over `series` for `asset`.
    pub fn new(series: PriceSeries, asset: impl Into<String>) -> Self {
        Self {
            series,
            asset: asset.into(),
        }
    }

    /// Simulates every combination and returns the blotters in generation order.
    ///
    /// # Errors
    /// Returns the first error hit: an invalid combination or a calendar failure.
    pub fn with<PC, C>(&self, combinations: &PC, calendar: &C) -> Result<Vec<(StrategyParams, Blotter)>>
    where
        PC: ParameterCombination + ?Sized,
        C: TradingCalendar + Sync + ?Sized,
    {
        let num_cpus = num_cpus::get();
        let combinations = combinations.generate();
        let chunk_size = combinations.len().div_ceil(num_cpus).max(1);

        combinations
            .par_chunks(chunk_size)
            .map::<_, Result<_>>(|par_combinations| {
                let mut local_results = Vec::with_capacity(par_combinations.len());
                for params in par_combinations {
                    let simulation = Simulation::new(self.series.clone(), self.asset.clone(), *params)?;
                    local_results.push((*params, simulation.run(calendar)?));
                }
                Ok(local_results)
            })
            .collect::<Result<Vec<_>>>()
            .map(|chunks| chunks.into_iter().flatten().collect())
    }

    /// Runs [`Optimizer::with`] and ranks the results by compounded return, best first.
    #[cfg(feature = "metrics")]
    pub fn rank<PC, C>(&self, combinations: &PC, calendar: &C) -> Result<Vec<(StrategyParams, crate::metrics::Metrics)>>
    where
        PC: ParameterCombination + ?Sized,
        C: TradingCalendar + Sync + ?Sized,
    {
        let mut ranked: Vec<_> = self
            .with(combinations, calendar)?
            .into_iter()
            .map(|(params, blotter)| (params, crate::metrics::Metrics::from(&blotter)))
            .collect();
        ranked.sort_by(|(_, a), (_, b)| b.compounded_return().cmp(&a.compounded_return()));
        Ok(ranked)
    }
}
