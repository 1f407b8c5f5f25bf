//! Per-Second Aggregation of Irregular Samples
//!
//! ## Overview
//!
//! The logger emits rows at an irregular rate: several rows can share one
//! second, and whole seconds can be absent (radio drop-outs, logger stalls).
//! This module collapses that stream into exactly one [`AggregatedSecond`] per
//! elapsed second between the first and last sample.
//!
//! ## Algorithm
//!
//! A [`Bucket`] accumulator holds the open second: its timestamp, the number of
//! samples folded so far, running per-channel means and a running AND of the
//! illumination flag. Each incoming sample is classified against the bucket
//! with [`classify_step`]:
//!
//! ```text
//! same second      → fold:   mean' = (mean·n + x) / (n + 1), lit' = lit ∧ x_lit
//! next second      → close bucket, open a new one seeded with the sample
//! k seconds later  → close bucket, emit k-1 placeholders, open a new one
//! earlier second   → OutOfOrderInput
//! ```
//!
//! The first sample seeds the first bucket; the last bucket is emitted by
//! [`Aggregator::finish`].
//!
//! ## Example
//!
//! ```rust
//! use gasguard_core::{aggregate, RawSample};
//!
//! let samples = [
//!     RawSample::new(0, 10.0, 0.0, 20.0, false),
//!     RawSample::new(0, 12.0, 0.0, 20.0, false),
//!     RawSample::new(1, 14.0, 0.0, 20.0, false),
//!     RawSample::new(3, 20.0, 0.0, 20.0, false),
//! ];
//!
//! let seconds = aggregate(&samples)?;
//! let we: Vec<_> = seconds.iter().map(|s| s.mean_we).collect();
//! assert_eq!(we, vec![Some(11.0), Some(14.0), None, Some(20.0)]);
//! # Ok::<(), gasguard_core::PipelineError>(())
//! ```

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    errors::{PipelineError, PipelineResult},
    sample::{AggregatedSecond, RawSample},
    time::{classify_step, span_seconds, SecondStep, Timestamp},
};

/// Running state of the second currently being filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    timestamp: Timestamp,
    count: u32,
    mean_we: f64,
    mean_aux: f64,
    mean_temp: f64,
    illuminated_all: bool,
}

impl Bucket {
    /// Open a bucket seeded with its first sample
    pub fn open(sample: &RawSample) -> Self {
        Self {
            timestamp: sample.timestamp,
            count: 1,
            mean_we: sample.working_electrode,
            mean_aux: sample.aux_electrode,
            mean_temp: sample.temperature,
            illuminated_all: sample.illuminated,
        }
    }

    /// Fold another sample from the same second into the bucket
    pub fn fold(self, sample: &RawSample) -> Self {
        let n = self.count;
        Self {
            timestamp: self.timestamp,
            count: n + 1,
            mean_we: incremental_mean(self.mean_we, n, sample.working_electrode),
            mean_aux: incremental_mean(self.mean_aux, n, sample.aux_electrode),
            mean_temp: incremental_mean(self.mean_temp, n, sample.temperature),
            illuminated_all: self.illuminated_all && sample.illuminated,
        }
    }

    /// Second this bucket covers
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Samples folded so far
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Freeze the bucket into its output record
    pub fn close(self) -> AggregatedSecond {
        AggregatedSecond {
            timestamp: self.timestamp,
            sample_count: self.count,
            mean_we: Some(self.mean_we),
            mean_aux: Some(self.mean_aux),
            mean_temp: Some(self.mean_temp),
            illuminated_all: Some(self.illuminated_all),
        }
    }
}

/// `(mean·n + x) / (n + 1)`
#[inline]
fn incremental_mean(mean: f64, n: u32, x: f64) -> f64 {
    let n = n as f64;
    (mean * n + x) / (n + 1.0)
}

/// Counters collected while aggregating
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregationStats {
    /// Raw samples consumed
    pub samples: usize,
    /// Seconds emitted, placeholders included
    pub seconds: usize,
    /// Placeholder seconds synthesized for gaps
    pub placeholders: usize,
    /// Distinct gaps (runs of placeholders)
    pub gaps: usize,
    /// Samples folded into an already open second
    pub folded: usize,
}

/// Streaming aggregator
///
/// Feed samples one at a time with [`push`](Aggregator::push); completed
/// seconds are appended to the caller's output vector as soon as they close.
/// [`finish`](Aggregator::finish) emits the last open second.
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    bucket: Option<Bucket>,
    stats: AggregationStats,
}

impl Aggregator {
    /// Create an aggregator with no open second
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters so far
    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }

    /// The second currently being filled, if any
    pub fn open_bucket(&self) -> Option<&Bucket> {
        self.bucket.as_ref()
    }

    /// Consume one sample
    pub fn push(
        &mut self,
        sample: &RawSample,
        out: &mut Vec<AggregatedSecond>,
    ) -> PipelineResult<()> {
        let index = self.stats.samples;

        if !sample.is_finite() {
            return Err(PipelineError::InvalidSample { index });
        }

        let next = match self.bucket.take() {
            None => Bucket::open(sample),
            Some(bucket) => match classify_step(bucket.timestamp, sample.timestamp) {
                SecondStep::Same => {
                    self.stats.folded += 1;
                    bucket.fold(sample)
                }
                SecondStep::Next => {
                    self.emit(bucket.close(), out);
                    Bucket::open(sample)
                }
                SecondStep::Gap { missing } => {
                    self.emit(bucket.close(), out);
                    log_debug!(
                        "Gap of {} s after t={}, synthesizing placeholders",
                        missing, bucket.timestamp
                    );
                    self.stats.gaps += 1;
                    for k in 1..=missing {
                        self.stats.placeholders += 1;
                        self.emit(AggregatedSecond::placeholder(bucket.timestamp + k as Timestamp), out);
                    }
                    Bucket::open(sample)
                }
                SecondStep::Backwards => {
                    // Put the bucket back so the aggregator stays consistent
                    self.bucket = Some(bucket);
                    return Err(PipelineError::OutOfOrderInput {
                        index,
                        previous: bucket.timestamp,
                        current: sample.timestamp,
                    });
                }
            },
        };

        self.bucket = Some(next);
        self.stats.samples += 1;
        Ok(())
    }

    /// Emit the last open second and return the final counters
    pub fn finish(mut self, out: &mut Vec<AggregatedSecond>) -> PipelineResult<AggregationStats> {
        let bucket = self.bucket.take().ok_or(PipelineError::EmptyInput)?;
        self.emit(bucket.close(), out);
        Ok(self.stats)
    }

    fn emit(&mut self, second: AggregatedSecond, out: &mut Vec<AggregatedSecond>) {
        self.stats.seconds += 1;
        out.push(second);
    }
}

/// Aggregate an ordered slice of samples into a contiguous 1 Hz series
pub fn aggregate(samples: &[RawSample]) -> PipelineResult<Vec<AggregatedSecond>> {
    aggregate_with_stats(samples).map(|(seconds, _)| seconds)
}

/// Same as [`aggregate`], also returning the aggregation counters
pub fn aggregate_with_stats(
    samples: &[RawSample],
) -> PipelineResult<(Vec<AggregatedSecond>, AggregationStats)> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first.timestamp, last.timestamp),
        _ => return Err(PipelineError::EmptyInput),
    };

    // Ordering is checked while pushing, so the span may be bogus here
    let capacity = span_seconds(first, last)
        .and_then(|span| usize::try_from(span).ok())
        .map_or(samples.len(), |span| span.min(samples.len()));

    let mut out = Vec::with_capacity(capacity);
    let mut aggregator = Aggregator::new();
    for sample in samples {
        aggregator.push(sample, &mut out)?;
    }
    let stats = aggregator.finish(&mut out)?;
    Ok((out, stats))
}
