//! Constants for GasGuard Core
//!
//! Named defaults for every tunable in the pipeline, taken from the field
//! logger the processing chain was developed against (1 Hz CSV export).
//!
//! ## Organization
//!
//! - **Quality**: window lengths, variance threshold and recovery period
//! - **Calibration**: sensor offset/sensitivity and the illumination correction
//! - **Source**: logger export column names and thresholds
//!
//! Always use these constants instead of magic numbers, and include units in
//! new names.

/// Moving-window lengths and quality-gate parameters.
pub mod quality;

/// Calibration parameters for the working electrode.
pub mod calibration;

/// Logger export format.
pub mod source;

pub use quality::{
    DEFAULT_AVERAGE_WINDOW_S, DEFAULT_STD_WINDOW_S, DEFAULT_TEMPERATURE_WINDOW_S,
    DEFAULT_STD_THRESHOLD_MV, DEFAULT_RECOVERY_S,
};

pub use calibration::{DEFAULT_WE_OFFSET_MV, DEFAULT_WE_SENSITIVITY, ILLUMINATION_CORRECTION};
