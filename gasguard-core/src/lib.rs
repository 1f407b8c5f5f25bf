//! Core processing engine for GasGuard
//!
//! Turns the irregular output of an electrochemical gas sensor logger into a
//! regular, gap-aware, quality-gated and calibrated 1 Hz series.
//!
//! Stages, in data-flow order:
//! - [`aggregator`]: collapse duplicate seconds, synthesize placeholders for gaps
//! - [`window`]: trailing moving mean / population standard deviation
//! - [`gate`]: blank a fixed recovery window after a variance spike
//! - [`calibration`]: offset/sensitivity transform, standard or resilient
//!
//! [`pipeline::Pipeline`] runs all of them from a validated
//! [`config::PipelineConfig`].
//!
//! ```no_run
//! use gasguard_core::{Pipeline, PipelineConfig, RawSample};
//!
//! let samples = vec![
//!     RawSample::new(0, 226.1, 231.0, 21.4, false),
//!     RawSample::new(1, 226.3, 231.2, 21.4, false),
//! ];
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let output = pipeline.run(&samples)?;
//! for (index, value) in output.calibrated_gated.standard.iter_indexed() {
//!     match value {
//!         Some(ppb) => println!("{index}: {ppb}"),
//!         None => println!("{index}: missing"),
//!     }
//! }
//! # Ok::<(), gasguard_core::PipelineError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod aggregator;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gate;
pub mod pipeline;
pub mod sample;
pub mod series;
pub mod source;
pub mod time;
pub mod transitions;
pub mod window;

// Public API
pub use aggregator::{aggregate, Aggregator, AggregationStats};
pub use calibration::{calibrate, Calibration, CalibrationMode};
pub use config::PipelineConfig;
pub use errors::{PipelineError, PipelineResult};
pub use gate::{gate, Blackout, GatedSeries, QualityGate};
pub use pipeline::{CalibratedPair, Pipeline, PipelineOutput, PipelineSummary, RunError};
pub use sample::{AggregatedSecond, Channel, RawSample};
pub use series::Series;
pub use source::{MemorySource, SampleSource};
pub use time::Timestamp;
pub use transitions::{illumination_transitions, IlluminationTransition, TransitionKind};
pub use window::{moving_mean, moving_std};

/// Crate version, as published
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
