//! Error Types for the Processing Pipeline
//!
//! ## Design Philosophy
//!
//! Every error here is a precondition or configuration violation. The core is a
//! pure, deterministic batch transform, so nothing is retryable and nothing is
//! degraded silently: a stage either returns its full output or an error.
//!
//! Missing data is *not* an error. Gaps in the recording and gate blackouts are
//! carried in-band as `None` values and propagate through every stage.
//!
//! Errors stay small and `Copy`: reasons are `&'static str`, never `String`.
//!
//! ## Error Categories
//!
//! ### Input Violations
//! - `EmptyInput`: nothing to aggregate
//! - `OutOfOrderInput`: a timestamp precedes its predecessor
//! - `InvalidSample`: a channel reading is NaN or infinite
//!
//! ### Configuration Violations
//! - `InvalidWindow`: zero window, or window not shorter than the series
//! - `InvalidConfig`: zero sensitivity, zero recovery, bad threshold
//! - `MisalignedSeries`: an auxiliary sequence does not line up with the series
//!
//! ## Handling
//!
//! ```rust
//! use gasguard_core::{aggregate, PipelineError, RawSample};
//!
//! let samples = [
//!     RawSample::new(10, 1.0, 1.0, 20.0, false),
//!     RawSample::new(9, 1.0, 1.0, 20.0, false),
//! ];
//!
//! match aggregate(&samples) {
//!     Err(PipelineError::OutOfOrderInput { index, .. }) => assert_eq!(index, 1),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror_no_std::Error;

use crate::time::Timestamp;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline errors - all fatal, no partial results
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PipelineError {
    /// No samples were supplied
    #[error("No samples to aggregate")]
    EmptyInput,

    /// Timestamps went backwards
    #[error("Sample {index} at t={current} precedes previous sample at t={previous}")]
    OutOfOrderInput {
        /// Position of the offending sample in the input
        index: usize,
        /// Timestamp of the sample before it
        previous: Timestamp,
        /// Timestamp of the offending sample
        current: Timestamp,
    },

    /// A raw reading is not a finite number
    #[error("Sample {index} carries a non-finite reading")]
    InvalidSample {
        /// Position of the offending sample in the input
        index: usize,
    },

    /// Window length is zero or does not leave any output
    #[error("Window {window} invalid for series of length {length}")]
    InvalidWindow {
        /// Requested window length
        window: usize,
        /// Length of the series it was applied to
        length: usize,
    },

    /// Parameter outside its valid domain
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which parameter and why
        reason: &'static str,
    },

    /// Auxiliary sequence does not line up with the series it annotates
    #[error("Misaligned sequence: expected {expected}, got {actual}")]
    MisalignedSeries {
        /// Required length, offset or end position
        expected: usize,
        /// Value supplied
        actual: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for PipelineError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::EmptyInput =>
                defmt::write!(fmt, "Empty input"),
            Self::OutOfOrderInput { index, previous, current } =>
                defmt::write!(fmt, "Sample {} out of order ({} < {})", index, current, previous),
            Self::InvalidSample { index } =>
                defmt::write!(fmt, "Sample {} not finite", index),
            Self::InvalidWindow { window, length } =>
                defmt::write!(fmt, "Window {} invalid for length {}", window, length),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
            Self::MisalignedSeries { expected, actual } =>
                defmt::write!(fmt, "Misaligned: expected {}, got {}", expected, actual),
        }
    }
}
