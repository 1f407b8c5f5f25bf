//! Variance-Triggered Quality Gate
//!
//! ## Overview
//!
//! Electrochemical cells exhibit transient noise bursts (airflow, handling,
//! electrical pick-up). The gate suppresses the moving average while the
//! signal is unsettled: whenever the trailing standard deviation reaches the
//! threshold, a fixed recovery window of output is blanked.
//!
//! ## Hysteresis
//!
//! The gate is a forward scan, not a per-position map:
//!
//! ```text
//! i = max(avg_window, std_window)
//! while i < len:
//!     if std[i] < threshold:  emit mean[i];            i += 1
//!     else:                   emit missing up to min(i + recovery, len); i = that
//! ```
//!
//! Variance is not re-checked inside a blackout, so a brief disturbance still
//! costs the full recovery period. The last blackout is truncated at the end
//! of the series. A trailing window that contains a gap has no standard
//! deviation; it cannot be shown to be quiet and is treated like a spike.
//!
//! ## Example
//!
//! ```rust
//! use gasguard_core::gate;
//!
//! let mut values: Vec<Option<f64>> = vec![Some(10.0); 40];
//! values[20] = Some(50.0); // burst
//!
//! let gated = gate(&values, 4, 4, 1.0, 5)?;
//! assert_eq!(gated.blackouts().len(), 1);
//! assert_eq!(gated.blackouts()[0].start, 21);
//! assert_eq!(gated.blanked_seconds(), 5);
//! # Ok::<(), gasguard_core::PipelineError>(())
//! ```

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    errors::{PipelineError, PipelineResult},
    series::Series,
    window::{check_window, moving_mean, moving_std},
};

/// A run of blanked positions, absolute and half-open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Blackout {
    /// First blanked position
    pub start: usize,
    /// One past the last blanked position
    pub end: usize,
}

impl Blackout {
    /// Number of blanked positions
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length run
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// True if `position` falls inside the run
    pub fn contains(&self, position: usize) -> bool {
        (self.start..self.end).contains(&position)
    }
}

/// Gated moving average plus the blackouts that shaped it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GatedSeries {
    series: Series,
    blackouts: Vec<Blackout>,
}

impl GatedSeries {
    /// The gated values, first element at `max(avg_window, std_window)`
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Variance-triggered blackouts, in time order
    pub fn blackouts(&self) -> &[Blackout] {
        &self.blackouts
    }

    /// Positions blanked by the gate (gaps in the input not counted)
    pub fn blanked_seconds(&self) -> usize {
        self.blackouts.iter().map(Blackout::len).sum()
    }

    /// Drop the blackout list, keeping the values
    pub fn into_series(self) -> Series {
        self.series
    }
}

/// Gate parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityGate {
    avg_window: usize,
    std_window: usize,
    std_threshold: f64,
    recovery: usize,
}

impl QualityGate {
    /// Create a gate
    ///
    /// Window lengths are checked against the series when the gate is applied.
    pub fn new(
        avg_window: usize,
        std_window: usize,
        std_threshold: f64,
        recovery: usize,
    ) -> PipelineResult<Self> {
        if !std_threshold.is_finite() || std_threshold < 0.0 {
            return Err(PipelineError::InvalidConfig {
                reason: "std threshold must be finite and non-negative",
            });
        }
        if recovery == 0 {
            return Err(PipelineError::InvalidConfig {
                reason: "recovery duration must be positive",
            });
        }

        Ok(Self {
            avg_window,
            std_window,
            std_threshold,
            recovery,
        })
    }

    /// First position the gate can emit
    pub fn start(&self) -> usize {
        self.avg_window.max(self.std_window)
    }

    /// Gate a per-second channel
    pub fn apply(&self, values: &[Option<f64>]) -> PipelineResult<GatedSeries> {
        check_window(self.avg_window, values.len())?;
        check_window(self.std_window, values.len())?;

        let mean = moving_mean(values, self.avg_window)?;
        let std = moving_std(values, self.std_window)?;
        self.apply_to_stats(&mean, &std)
    }

    /// Gate precomputed statistics
    ///
    /// `mean` must start at `avg_window`, `std` at `std_window`, and both must
    /// end at the same position.
    pub fn apply_to_stats(&self, mean: &Series, std: &Series) -> PipelineResult<GatedSeries> {
        if mean.offset() != self.avg_window {
            return Err(PipelineError::MisalignedSeries {
                expected: self.avg_window,
                actual: mean.offset(),
            });
        }
        if std.offset() != self.std_window {
            return Err(PipelineError::MisalignedSeries {
                expected: self.std_window,
                actual: std.offset(),
            });
        }
        if std.end() != mean.end() {
            return Err(PipelineError::MisalignedSeries {
                expected: mean.end(),
                actual: std.end(),
            });
        }

        let length = mean.end();
        let start = self.start();
        let mut values = Vec::with_capacity(length.saturating_sub(start));
        let mut blackouts = Vec::new();

        let mut i = start;
        while i < length {
            let quiet = matches!(std.at(i), Some(s) if s < self.std_threshold);
            if quiet {
                values.push(mean.at(i));
                i += 1;
            } else {
                let end = i.saturating_add(self.recovery).min(length);
                log_debug!(
                    "Gate blackout [{}, {}) (std {:?}, threshold {})",
                    i, end, std.at(i), self.std_threshold
                );
                values.resize(values.len() + (end - i), None);
                blackouts.push(Blackout { start: i, end });
                i = end;
            }
        }

        Ok(GatedSeries {
            series: Series::new(start, values),
            blackouts,
        })
    }
}

/// Gate `values` with the given parameters
pub fn gate(
    values: &[Option<f64>],
    avg_window: usize,
    std_window: usize,
    std_threshold: f64,
    recovery: usize,
) -> PipelineResult<GatedSeries> {
    QualityGate::new(avg_window, std_window, std_threshold, recovery)?.apply(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(len: usize, level: f64) -> Vec<Option<f64>> {
        vec![Some(level); len]
    }

    #[test]
    fn quiet_signal_passes_through() {
        let values = flat(50, 12.5);
        let gated = gate(&values, 5, 10, 0.8, 20).unwrap();
        let mean = moving_mean(&values, 5).unwrap();

        assert_eq!(gated.series().offset(), 10);
        assert_eq!(gated.series().end(), 50);
        assert!(gated.blackouts().is_empty());
        for (position, value) in gated.series().iter_indexed() {
            assert_eq!(value, mean.at(position));
        }
    }

    #[test]
    fn spike_blanks_recovery_window_then_resumes() {
        let mut values = flat(60, 10.0);
        values[20] = Some(30.0);

        // std window 3: positions 21, 22, 23 see the spike
        let gated = gate(&values, 3, 3, 1.0, 10).unwrap();
        assert_eq!(gated.blackouts(), &[Blackout { start: 21, end: 31 }]);

        let series = gated.series();
        for position in 21..31 {
            assert_eq!(series.at(position), None);
        }
        // The spike has left the std window by 31, and the mean window too
        assert_eq!(series.at(31), Some(10.0));
        assert_eq!(series.at(20), Some(10.0));
    }

    #[test]
    fn blackout_truncated_at_end() {
        let mut values = flat(30, 10.0);
        values[25] = Some(99.0);

        let gated = gate(&values, 2, 2, 0.5, 100).unwrap();
        assert_eq!(gated.blackouts(), &[Blackout { start: 26, end: 30 }]);
        assert_eq!(gated.series().end(), 30);
        assert_eq!(gated.blanked_seconds(), 4);
    }

    #[test]
    fn threshold_is_strict() {
        // Alternating 0/2 has population std exactly 1
        let values: Vec<Option<f64>> = (0..20).map(|i| Some((i % 2) as f64 * 2.0)).collect();

        let at_threshold = gate(&values, 2, 2, 1.0, 3).unwrap();
        assert!(at_threshold.series().values()[..3].iter().all(Option::is_none));

        let above = gate(&values, 2, 2, 1.0 + 1e-9, 3).unwrap();
        assert!(above.blackouts().is_empty());
    }

    #[test]
    fn unbounded_recovery_blanks_to_end() {
        let mut values = flat(20, 10.0);
        values[10] = Some(99.0);

        let gated = gate(&values, 2, 2, 0.5, usize::MAX).unwrap();
        assert_eq!(gated.blackouts(), &[Blackout { start: 11, end: 20 }]);
        assert_eq!(gated.series().end(), 20);
        assert_eq!(gated.series().at(10), Some(10.0));
    }

    #[test]
    fn gap_in_std_window_blanks() {
        let mut values = flat(40, 5.0);
        values[10] = None;

        let gated = gate(&values, 2, 4, 1.0, 6).unwrap();
        // First window containing position 10 ends at 11
        assert_eq!(gated.blackouts()[0], Blackout { start: 11, end: 17 });
    }

    #[test]
    fn rejects_bad_parameters() {
        let values = flat(10, 1.0);
        assert!(matches!(
            gate(&values, 2, 2, 1.0, 0),
            Err(PipelineError::InvalidConfig { .. })
        ));
        assert!(matches!(
            gate(&values, 2, 2, -0.1, 5),
            Err(PipelineError::InvalidConfig { .. })
        ));
        assert!(matches!(
            gate(&values, 2, 2, f64::NAN, 5),
            Err(PipelineError::InvalidConfig { .. })
        ));
        assert_eq!(
            gate(&values, 2, 10, 1.0, 5),
            Err(PipelineError::InvalidWindow { window: 10, length: 10 })
        );
    }

    #[test]
    fn misaligned_statistics_rejected() {
        let values = flat(20, 1.0);
        let mean = moving_mean(&values, 3).unwrap();
        let std = moving_std(&values, 3).unwrap();

        let g = QualityGate::new(4, 3, 1.0, 5).unwrap();
        assert!(matches!(
            g.apply_to_stats(&mean, &std),
            Err(PipelineError::MisalignedSeries { .. })
        ));
    }

    #[test]
    fn misaligned_std_offset_reports_offsets() {
        let values = flat(20, 1.0);
        let mean = moving_mean(&values, 3).unwrap();
        let std = moving_std(&values, 4).unwrap();

        // Both end at 20; only the offsets disagree
        let g = QualityGate::new(3, 3, 1.0, 5).unwrap();
        assert_eq!(
            g.apply_to_stats(&mean, &std),
            Err(PipelineError::MisalignedSeries { expected: 3, actual: 4 })
        );
    }
}
