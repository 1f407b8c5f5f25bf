//! Linear calibration of the working electrode
//!
//! Converts a moving-average voltage into a concentration:
//!
//! ```text
//! value = (avg - offset + correction) / sensitivity
//! ```
//!
//! - **Standard**: `correction = 0`. Illumination is ignored entirely.
//! - **Resilient**: `correction = 1` for seconds where the light source was on
//!   throughout, `0` otherwise. A second with unknown illumination (a gap) has
//!   no calibrated value in this variant.
//!
//! A missing moving average always yields a missing calibrated value.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use alloc::vec::Vec;

use crate::{
    constants::calibration::ILLUMINATION_CORRECTION,
    errors::{PipelineError, PipelineResult},
    series::Series,
};

/// Which calibration formula to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CalibrationMode {
    /// Offset and sensitivity only
    #[default]
    Standard,
    /// Adds the illumination correction before scaling
    Resilient,
}

impl CalibrationMode {
    /// `Resilient` when `resilient` is set, `Standard` otherwise
    pub fn from_resilient(resilient: bool) -> Self {
        if resilient {
            Self::Resilient
        } else {
            Self::Standard
        }
    }

    /// Additive correction for a second with the given illumination state
    ///
    /// `None` only when the state matters and is unknown.
    pub fn correction(self, illuminated: Option<bool>) -> Option<f64> {
        match self {
            Self::Standard => Some(0.0),
            Self::Resilient => illuminated.map(|lit| if lit { ILLUMINATION_CORRECTION } else { 0.0 }),
        }
    }
}

/// Offset and sensitivity of the working electrode
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    offset: f64,
    sensitivity: f64,
}

impl Calibration {
    /// Create a calibration; sensitivity must be finite and non-zero
    pub fn new(offset: f64, sensitivity: f64) -> PipelineResult<Self> {
        if !offset.is_finite() {
            return Err(PipelineError::InvalidConfig {
                reason: "calibration offset must be finite",
            });
        }
        if sensitivity == 0.0 || !sensitivity.is_finite() {
            return Err(PipelineError::InvalidConfig {
                reason: "sensitivity must be finite and non-zero",
            });
        }
        Ok(Self { offset, sensitivity })
    }

    /// Sensor offset in mV
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Sensor sensitivity in mV per unit
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Calibrate one value
    pub fn value(&self, average: Option<f64>, illuminated: Option<bool>, mode: CalibrationMode) -> Option<f64> {
        let average = average?;
        let correction = mode.correction(illuminated)?;
        Some((average - self.offset + correction) / self.sensitivity)
    }

    /// Calibrate a moving-average series
    ///
    /// `illuminated` is the per-second illumination sequence of the aggregated
    /// series; the value at absolute position `p` is paired with
    /// `illuminated[p]`, so it must cover at least `series.end()` seconds.
    pub fn apply(
        &self,
        series: &Series,
        illuminated: &[Option<bool>],
        mode: CalibrationMode,
    ) -> PipelineResult<Series> {
        if illuminated.len() < series.end() {
            return Err(PipelineError::MisalignedSeries {
                expected: series.end(),
                actual: illuminated.len(),
            });
        }

        let values: Vec<Option<f64>> = series
            .iter_indexed()
            .map(|(position, average)| self.value(average, illuminated[position], mode))
            .collect();

        Ok(Series::new(series.offset(), values))
    }
}

/// Calibrate `series` with explicit parameters
pub fn calibrate(
    series: &Series,
    illuminated: &[Option<bool>],
    offset: f64,
    sensitivity: f64,
    resilient: bool,
) -> PipelineResult<Series> {
    Calibration::new(offset, sensitivity)?.apply(series, illuminated, CalibrationMode::from_resilient(resilient))
}
