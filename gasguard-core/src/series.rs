//! Offset-aligned series with explicit missing values
//!
//! Every stage after the aggregator produces a [`Series`]: a run of
//! `Option<f64>` whose first element sits at absolute second index `offset` of
//! the aggregated series. A window of length `w` has no value for the first
//! `w` seconds, so those positions are omitted rather than zero-filled, and
//! the offset keeps the remaining values aligned with elapsed time.
//!
//! ```text
//! aggregated:  [ s0  s1  s2  s3  s4  s5 ]
//! mean (w=2):          [ m2  m3  m4  m5 ]   offset = 2
//! ```

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Values aligned to aggregated-second positions `offset..offset + len`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Series {
    offset: usize,
    values: Vec<Option<f64>>,
}

impl Series {
    /// Wrap values whose first element belongs to absolute position `offset`
    pub fn new(offset: usize, values: Vec<Option<f64>>) -> Self {
        Self { offset, values }
    }

    /// Absolute position of the first element
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of positions held
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the series holds no positions
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One past the last absolute position
    pub fn end(&self) -> usize {
        self.offset + self.values.len()
    }

    /// Value at relative position `index`
    ///
    /// `None` both for missing values and out-of-range indices; use
    /// [`Series::is_missing`] to tell them apart.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value at absolute aggregated-second position
    pub fn at(&self, position: usize) -> Option<f64> {
        position
            .checked_sub(self.offset)
            .and_then(|index| self.get(index))
    }

    /// True if relative position `index` exists and holds no value
    pub fn is_missing(&self, index: usize) -> bool {
        matches!(self.values.get(index), Some(None))
    }

    /// Count of missing positions
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Raw values, relative order
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Iterate over values in time order
    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().copied()
    }

    /// Iterate as `(absolute position, value)` pairs
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, Option<f64>)> + '_ {
        let offset = self.offset;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (offset + i, *v))
    }

    /// Consume the series, returning its values
    pub fn into_values(self) -> Vec<Option<f64>> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Series {
        Series::new(2, vec![Some(1.0), None, Some(3.0)])
    }

    #[test]
    fn absolute_and_relative_access() {
        let s = sample();
        assert_eq!(s.get(0), Some(1.0));
        assert_eq!(s.at(2), Some(1.0));
        assert_eq!(s.at(4), Some(3.0));
        assert_eq!(s.at(1), None);
        assert_eq!(s.at(5), None);
        assert_eq!(s.end(), 5);
    }

    #[test]
    fn missing_is_distinct_from_out_of_range() {
        let s = sample();
        assert!(s.is_missing(1));
        assert!(!s.is_missing(0));
        assert!(!s.is_missing(10));
        assert_eq!(s.missing_count(), 1);
    }

    #[test]
    fn indexed_iteration_uses_absolute_positions() {
        let positions: Vec<usize> = sample().iter_indexed().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![2, 3, 4]);
    }
}
