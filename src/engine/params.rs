use rust_decimal::Decimal;

use crate::errors::{Error, Result};

/// Parameters of the limit-order rule.
///
/// `alpha1`/`alpha2` are signed fractions applied to a reference price
/// (`price * (1 + alpha)`), `n1`/`n2` are lookahead windows in trading days.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyParams {
    /// Entry offset applied to the previous close.
    pub alpha1: Decimal,
    /// Entry window length.
    pub n1: usize,
    /// Exit offset applied to the entry fill price.
    pub alpha2: Decimal,
    /// Exit window length.
    pub n2: usize,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            alpha1: Decimal::new(-1, 2),
            n1: 3,
            alpha2: Decimal::new(1, 2),
            n2: 5,
        }
    }
}

impl StrategyParams {
    /// Creates validated parameters.
    ///
    /// ### Example
    /// ```rust
    /// use blotter_rs::prelude::*;
    /// use rust_decimal_macros::dec;
    ///
    /// let params = StrategyParams::new(dec!(-0.01), 3, dec!(0.01), 5).unwrap();
    /// assert_eq!(params, StrategyParams::default());
    ///
    /// assert!(StrategyParams::new(dec!(-0.01), 0, dec!(0.01), 5).is_err());
    /// ```
    pub fn new(alpha1: Decimal, n1: usize, alpha2: Decimal, n2: usize) -> Result<Self> {
        let params = Self { alpha1, n1, alpha2, n2 };
        params.validate()?;
        Ok(params)
    }

    /// Checks window lengths and offset bounds.
    pub fn validate(&self) -> Result<()> {
        check_window("n1", self.n1)?;
        check_window("n2", self.n2)?;
        check_alpha("alpha1", self.alpha1)?;
        check_alpha("alpha2", self.alpha2)
    }
}

pub(crate) fn check_window(name: &'static str, value: usize) -> Result<()> {
    if value < 1 {
        return Err(Error::InvalidWindow { name, value });
    }
    Ok(())
}

pub(crate) fn check_alpha(name: &'static str, value: Decimal) -> Result<()> {
    if !(-Decimal::ONE..=Decimal::ONE).contains(&value) {
        return Err(Error::AlphaOutOfBounds { name, value });
    }
    Ok(())
}
