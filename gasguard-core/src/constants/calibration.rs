//! Calibration Parameters
//!
//! The defaults are the identity transform: the pipeline reports millivolts
//! until a cell-specific offset and sensitivity are configured (the field
//! cell used 226 mV and 0.3).

/// Working electrode offset (mV).
pub const DEFAULT_WE_OFFSET_MV: f64 = 0.0;

/// Working electrode sensitivity (mV per output unit).
pub const DEFAULT_WE_SENSITIVITY: f64 = 1.0;

/// Additive correction applied by the resilient variant while the light
/// source is on (mV, before scaling).
pub const ILLUMINATION_CORRECTION: f64 = 1.0;
