//! Forward-looking rolling windows.
//!
//! Both legs ask the same two questions of the bars that follow an order:
//! does the limit price get touched at all, and if so, on which day first.
//! A window cut short by the end of the data with no touch is neither a fill
//! nor a cancellation and is reported as [`WindowOutcome::Unresolved`].

use super::params::check_window;
use crate::errors::Result;

/// What happened inside the lookahead window of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOutcome {
    /// First index (absolute, into the scanned values) satisfying the predicate.
    Touched(usize),
    /// The full window elapsed without a touch; holds the index of its last value.
    NeverTouched(usize),
    /// The data ended before the window did, and nothing touched.
    Unresolved,
}

/// Evaluates windows `values[i..min(i + window, len))` against a predicate.
#[derive(Debug, Clone, Copy)]
pub struct WindowScanner<'a, T> {
    values: &'a [T],
    window: usize,
}

impl<'a, T: Copy> WindowScanner<'a, T> {
    /// Creates a scanner over `values` with windows of `window` values.
    ///
    /// ### Errors
    /// [`Error::InvalidWindow`](crate::errors::Error::InvalidWindow) if `window` is zero.
    pub fn new(values: &'a [T], window: usize) -> Result<Self> {
        check_window("window", window)?;
        Ok(Self { values, window })
    }

    /// Returns the values covered by the window starting at `start`.
    fn slice(&self, start: usize) -> &'a [T] {
        let start = start.min(self.values.len());
        let end = start.saturating_add(self.window).min(self.values.len());
        &self.values[start..end]
    }

    /// Returns `true` if the window starting at `start` runs past the data.
    pub fn is_truncated(&self, start: usize) -> bool {
        start.saturating_add(self.window) > self.values.len()
    }

    /// Returns `true` if no value in the window satisfies `touch`.
    pub fn never_touches<P>(&self, start: usize, touch: P) -> bool
    where
        P: Fn(T) -> bool,
    {
        !self.slice(start).iter().any(|v| touch(*v))
    }

    /// Returns the smallest index in the window whose value satisfies `touch`.
    pub fn first_touch_index<P>(&self, start: usize, touch: P) -> Option<usize>
    where
        P: Fn(T) -> bool,
    {
        self.slice(start).iter().position(|v| touch(*v)).map(|offset| start + offset)
    }

    /// Classifies the window starting at `start`.
    pub fn scan<P>(&self, start: usize, touch: P) -> WindowOutcome
    where
        P: Fn(T) -> bool,
    {
        match self.first_touch_index(start, &touch) {
            Some(index) => WindowOutcome::Touched(index),
            None if self.is_truncated(start) => WindowOutcome::Unresolved,
            None => WindowOutcome::NeverTouched(start + self.window - 1),
        }
    }
}
