//! End-to-End Processing Pipeline
//!
//! ## Overview
//!
//! [`Pipeline`] wires the stages together from one validated
//! [`PipelineConfig`]:
//!
//! ```text
//! RawSample ─→ Aggregator ─→ per-second channels
//!                               │
//!              WE ──────────────┼─→ moving mean ─┬─→ QualityGate ─→ calibrate ×2
//!                               │   moving std ──┘          │
//!                               │        └─────────────────────→ calibrate ×2
//!              AUX ─────────────┼─→ moving mean
//!              Temp ────────────┴─→ moving mean (temperature window)
//! ```
//!
//! Every stage produces a new series; nothing is mutated in place. The gate
//! consumes the same moving mean and moving standard deviation that are
//! reported, so with no variance spike the gated series equals the moving
//! mean exactly.
//!
//! Both calibration variants are always computed. The configured
//! `resilient` flag only selects which one [`PipelineOutput::calibrated`]
//! returns.
//!
//! ## Sources
//!
//! [`Pipeline::run`] takes a slice. [`Pipeline::run_source`] pulls from any
//! [`SampleSource`] and aggregates as samples arrive, so the raw samples are
//! never held in memory all at once.

use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    aggregator::{aggregate_with_stats, AggregationStats, Aggregator},
    calibration::{Calibration, CalibrationMode},
    config::PipelineConfig,
    errors::{PipelineError, PipelineResult},
    gate::{GatedSeries, QualityGate},
    sample::{channel_values, illumination, AggregatedSecond, Channel, RawSample},
    series::Series,
    source::SampleSource,
    time::Timestamp,
    transitions::{illumination_transitions, IlluminationTransition},
    window::{moving_mean, moving_std},
};

/// The same series calibrated both ways
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibratedPair {
    /// Offset and sensitivity only
    pub standard: Series,
    /// With the illumination correction
    pub resilient: Series,
}

impl CalibratedPair {
    /// The variant for `mode`
    pub fn get(&self, mode: CalibrationMode) -> &Series {
        match mode {
            CalibrationMode::Standard => &self.standard,
            CalibrationMode::Resilient => &self.resilient,
        }
    }
}

/// Run counters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineSummary {
    /// Raw samples consumed
    pub samples: usize,
    /// Length of the regularized series
    pub total_seconds: usize,
    /// Seconds synthesized for gaps
    pub placeholder_seconds: usize,
    /// Distinct gaps in the recording
    pub gaps: usize,
    /// Variance-triggered blackouts
    pub blackouts: usize,
    /// Seconds blanked by the gate
    pub blanked_seconds: usize,
    /// Fraction of gated positions carrying a value, in `[0, 1]`
    pub coverage: f64,
}

impl PipelineSummary {
    fn new(stats: &AggregationStats, gated: &GatedSeries) -> Self {
        let series = gated.series();
        let coverage = if series.is_empty() {
            0.0
        } else {
            (series.len() - series.missing_count()) as f64 / series.len() as f64
        };

        Self {
            samples: stats.samples,
            total_seconds: stats.seconds,
            placeholder_seconds: stats.placeholders,
            gaps: stats.gaps,
            blackouts: gated.blackouts().len(),
            blanked_seconds: gated.blanked_seconds(),
            coverage,
        }
    }
}

/// Everything a run produces
///
/// Series positions are absolute indices into `aggregated`; use
/// [`timestamp`](PipelineOutput::timestamp) to map them back to time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineOutput {
    /// Regular 1 Hz series
    pub aggregated: Vec<AggregatedSecond>,
    /// Aggregation counters
    pub aggregation: AggregationStats,
    /// Working electrode moving mean (average window)
    pub we_mean: Series,
    /// Working electrode moving standard deviation (std window)
    pub we_std: Series,
    /// Auxiliary electrode moving mean (average window)
    pub aux_mean: Series,
    /// Temperature moving mean (temperature window)
    pub temperature_mean: Series,
    /// Gated working electrode moving mean
    pub gated: GatedSeries,
    /// Calibrated moving mean
    pub calibrated_moving: CalibratedPair,
    /// Calibrated gated series
    pub calibrated_gated: CalibratedPair,
    /// Light source switching points
    pub transitions: Vec<IlluminationTransition>,
    /// Run counters
    pub summary: PipelineSummary,
    /// Variant selected by the configuration
    pub mode: CalibrationMode,
}

impl PipelineOutput {
    /// Calibrated gated series in the configured variant
    pub fn calibrated(&self) -> &Series {
        self.calibrated_gated.get(self.mode)
    }

    /// Timestamp of an absolute series position
    pub fn timestamp(&self, position: usize) -> Option<Timestamp> {
        self.aggregated.get(position).map(|second| second.timestamp)
    }
}

/// Failure of [`Pipeline::run_source`]
#[derive(Debug)]
pub enum RunError<E> {
    /// The source could not produce a sample
    Source(E),
    /// Processing failed
    Pipeline(PipelineError),
}

impl<E> From<PipelineError> for RunError<E> {
    fn from(error: PipelineError) -> Self {
        Self::Pipeline(error)
    }
}

impl<E: fmt::Display> fmt::Display for RunError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "Source error: {}", e),
            Self::Pipeline(e) => write!(f, "Pipeline error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for RunError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Pipeline(e) => Some(e),
        }
    }
}

/// Configured processing pipeline
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    config: PipelineConfig,
    calibration: Calibration,
    gate: QualityGate,
}

impl Pipeline {
    /// Validate `config` and build the stages
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            calibration: config.calibration()?,
            gate: config.quality_gate()?,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process an ordered slice of samples
    pub fn run(&self, samples: &[RawSample]) -> PipelineResult<PipelineOutput> {
        let (aggregated, stats) = aggregate_with_stats(samples)?;
        self.process(aggregated, stats)
    }

    /// Pull every sample from `source` and process them
    pub fn run_source<S: SampleSource>(
        &self,
        source: &mut S,
    ) -> Result<PipelineOutput, RunError<S::Error>> {
        let (lower, _) = source.size_hint();
        let mut aggregated = Vec::with_capacity(lower);
        let mut aggregator = Aggregator::new();

        while let Some(sample) = source.next_sample() {
            let sample = sample.map_err(RunError::Source)?;
            aggregator.push(&sample, &mut aggregated)?;
        }
        let stats = aggregator.finish(&mut aggregated)?;

        Ok(self.process(aggregated, stats)?)
    }

    fn process(
        &self,
        aggregated: Vec<AggregatedSecond>,
        stats: AggregationStats,
    ) -> PipelineResult<PipelineOutput> {
        let config = &self.config;
        config.check_length(aggregated.len())?;

        let we = channel_values(&aggregated, Channel::WorkingElectrode);
        let aux = channel_values(&aggregated, Channel::AuxElectrode);
        let temperature = channel_values(&aggregated, Channel::Temperature);

        let we_mean = moving_mean(&we, config.average_window)?;
        let we_std = moving_std(&we, config.std_window)?;
        let aux_mean = moving_mean(&aux, config.average_window)?;
        let temperature_mean = moving_mean(&temperature, config.temperature_window)?;

        let gated = self.gate.apply_to_stats(&we_mean, &we_std)?;

        let illuminated = illumination(&aggregated);
        let calibrated_moving = self.calibrate_both(&we_mean, &illuminated)?;
        let calibrated_gated = self.calibrate_both(gated.series(), &illuminated)?;

        let transitions = illumination_transitions(&aggregated);
        let summary = PipelineSummary::new(&stats, &gated);

        log_info!(
            "Processed {} samples into {} s ({} placeholder s in {} gaps), {} blackouts, coverage {:.3}",
            summary.samples,
            summary.total_seconds,
            summary.placeholder_seconds,
            summary.gaps,
            summary.blackouts,
            summary.coverage
        );

        Ok(PipelineOutput {
            aggregated,
            aggregation: stats,
            we_mean,
            we_std,
            aux_mean,
            temperature_mean,
            gated,
            calibrated_moving,
            calibrated_gated,
            transitions,
            summary,
            mode: config.mode(),
        })
    }

    fn calibrate_both(
        &self,
        series: &Series,
        illuminated: &[Option<bool>],
    ) -> PipelineResult<CalibratedPair> {
        Ok(CalibratedPair {
            standard: self.calibration.apply(series, illuminated, CalibrationMode::Standard)?,
            resilient: self.calibration.apply(series, illuminated, CalibrationMode::Resilient)?,
        })
    }
}
