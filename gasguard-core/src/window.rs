//! Trailing Window Statistics
//!
//! ## Overview
//!
//! Moving mean and moving population standard deviation over a per-second
//! channel. For output position `i` (from `window` to `len - 1`) the statistic
//! covers the half-open range `[i - window, i)`: the current second is *not*
//! part of its own window.
//!
//! ```text
//! values:   v0  v1  v2  v3  v4  v5
//! window=3            ↓   ↓   ↓
//! output:           m3  m4  m5      m3 = mean(v0, v1, v2)
//! ```
//!
//! ## Missing Values
//!
//! A window that contains any missing second has no value. Gaps therefore
//! widen by `window` positions in the output, which is the conservative
//! reading of a gap: no statistic is reported from partial data.
//!
//! ## Accumulator
//!
//! [`SlidingWindow`] keeps a ring of the last `window` values and running sums
//! of the present ones, so each position costs O(1) and the pass needs
//! O(window) memory. Sums are taken relative to an anchor value (shifted
//! data), which keeps `E[x²] - E[x]²` well conditioned for millivolt signals
//! sitting on a large DC offset.
//!
//! Adding and later subtracting a term that dwarfs the rest of the window
//! leaves only rounding noise behind. The sums are therefore rebuilt from the
//! ring, with the anchor moved to the oldest present value, once every
//! `window` pushes and whenever the squared sum falls below
//! [`CANCELLATION_RATIO`] of the largest term added since the last rebuild.
//! Both keep the per-position cost O(1) amortized, and results match a
//! direct computation over each window.

use alloc::vec::Vec;

use crate::{
    errors::{PipelineError, PipelineResult},
    series::Series,
};

/// Squared-sum fraction of the peak term below which the sums are rebuilt
pub const CANCELLATION_RATIO: f64 = 1e-6;

/// Fixed-length trailing window with running sums
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    slots: Vec<Option<f64>>,
    head: usize,
    filled: usize,
    missing: usize,
    shift: Option<f64>,
    sum: f64,
    sum_sq: f64,
    peak_sq: f64,
    since_rebuild: usize,
}

impl SlidingWindow {
    /// Create an empty window holding up to `capacity` values
    ///
    /// `capacity` must be non-zero; callers validate it with the series length.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize(capacity, None);
        Self {
            slots,
            head: 0,
            filled: 0,
            missing: 0,
            shift: None,
            sum: 0.0,
            sum_sq: 0.0,
            peak_sq: 0.0,
            since_rebuild: 0,
        }
    }

    /// Window length
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// True once `capacity` values have been pushed
    pub fn is_full(&self) -> bool {
        self.filled == self.slots.len()
    }

    /// Missing values currently inside the window
    pub fn missing(&self) -> usize {
        self.missing
    }

    /// Push a value, evicting the oldest one when full
    pub fn push(&mut self, value: Option<f64>) {
        if self.is_full() {
            let evicted = self.slots[self.head];
            self.remove(evicted);
        } else {
            self.filled += 1;
        }

        self.slots[self.head] = value;
        self.add(value);
        self.head = (self.head + 1) % self.slots.len();

        self.since_rebuild += 1;
        let cancelled = self.sum_sq < self.peak_sq * CANCELLATION_RATIO;
        if cancelled || self.since_rebuild >= self.slots.len() {
            self.rebuild();
        }
    }

    /// Arithmetic mean of a full, gap-free window
    pub fn mean(&self) -> Option<f64> {
        let shift = self.ready()?;
        Some(shift + self.sum / self.slots.len() as f64)
    }

    /// Population standard deviation of a full, gap-free window
    pub fn std(&self) -> Option<f64> {
        self.ready()?;
        let n = self.slots.len() as f64;
        let mean = self.sum / n;
        // Rounding can push a zero variance slightly negative
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        Some(libm::sqrt(variance))
    }

    fn ready(&self) -> Option<f64> {
        if !self.is_full() || self.missing > 0 {
            return None;
        }
        // A full window with nothing missing has seen at least one value
        self.shift
    }

    fn add(&mut self, value: Option<f64>) {
        match value {
            Some(x) => {
                let shift = *self.shift.get_or_insert(x);
                let d = x - shift;
                self.sum += d;
                self.sum_sq += d * d;
                self.peak_sq = self.peak_sq.max(d * d);
            }
            None => self.missing += 1,
        }
    }

    /// Values currently held, oldest first
    fn held(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        let start = if self.is_full() { self.head } else { 0 };
        (0..self.filled).map(move |k| self.slots[(start + k) % self.slots.len()])
    }

    /// Recompute the sums from the ring around a fresh anchor
    fn rebuild(&mut self) {
        self.since_rebuild = 0;
        let Some(shift) = self.held().flatten().next() else {
            self.sum = 0.0;
            self.sum_sq = 0.0;
            self.peak_sq = 0.0;
            return;
        };

        let (mut sum, mut sum_sq, mut peak_sq) = (0.0, 0.0, 0.0_f64);
        for x in self.held().flatten() {
            let d = x - shift;
            sum += d;
            sum_sq += d * d;
            peak_sq = peak_sq.max(d * d);
        }

        self.shift = Some(shift);
        self.sum = sum;
        self.sum_sq = sum_sq;
        self.peak_sq = peak_sq;
    }

    fn remove(&mut self, value: Option<f64>) {
        match (value, self.shift) {
            (Some(x), Some(shift)) => {
                let d = x - shift;
                self.sum -= d;
                self.sum_sq -= d * d;
            }
            (None, _) => self.missing -= 1,
            // Present values always set the shift before being stored
            (Some(_), None) => {}
        }
    }
}

/// Reject windows that are zero or leave no output positions
pub fn check_window(window: usize, length: usize) -> PipelineResult<()> {
    if window == 0 || window >= length {
        return Err(PipelineError::InvalidWindow { window, length });
    }
    Ok(())
}

/// Trailing moving mean; first element at absolute position `window`
pub fn moving_mean(values: &[Option<f64>], window: usize) -> PipelineResult<Series> {
    scan(values, window, SlidingWindow::mean)
}

/// Trailing moving population standard deviation; first element at `window`
pub fn moving_std(values: &[Option<f64>], window: usize) -> PipelineResult<Series> {
    scan(values, window, SlidingWindow::std)
}

fn scan(
    values: &[Option<f64>],
    window: usize,
    statistic: fn(&SlidingWindow) -> Option<f64>,
) -> PipelineResult<Series> {
    check_window(window, values.len())?;

    let mut acc = SlidingWindow::new(window);
    let mut out = Vec::with_capacity(values.len() - window);

    for (i, value) in values.iter().enumerate() {
        if i >= window {
            out.push(statistic(&acc));
        }
        acc.push(*value);
    }

    Ok(Series::new(window, out))
}

/// Mean of a slice, computed directly; `None` if empty or any value is missing
pub fn window_mean(values: &[Option<f64>]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sum = 0.0;
    for value in values {
        sum += (*value)?;
    }
    Some(sum / values.len() as f64)
}

/// Population standard deviation of a slice, computed directly (two-pass)
pub fn window_std(values: &[Option<f64>]) -> Option<f64> {
    let mean = window_mean(values)?;
    let sq: f64 = values
        .iter()
        .flatten()
        .map(|x| (x - mean) * (x - mean))
        .sum();
    Some(libm::sqrt(sq / values.len() as f64))
}
