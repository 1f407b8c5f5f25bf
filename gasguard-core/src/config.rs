//! Pipeline configuration
//!
//! Every parameter is explicit and validated before any computation starts.
//! Nothing is read from the environment; callers build a [`PipelineConfig`]
//! in code or deserialize one (`serde` feature, JSON via [`PipelineConfig::from_json_str`]).
//!
//! ```rust
//! use gasguard_core::PipelineConfig;
//!
//! let config = PipelineConfig::default()
//!     .with_calibration(226.0, 0.3)
//!     .with_gate(0.8, 600)
//!     .with_resilient(true);
//! assert!(config.validate().is_ok());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    calibration::{Calibration, CalibrationMode},
    constants::{
        DEFAULT_AVERAGE_WINDOW_S, DEFAULT_RECOVERY_S, DEFAULT_STD_THRESHOLD_MV,
        DEFAULT_STD_WINDOW_S, DEFAULT_TEMPERATURE_WINDOW_S, DEFAULT_WE_OFFSET_MV,
        DEFAULT_WE_SENSITIVITY,
    },
    errors::{PipelineError, PipelineResult},
    gate::QualityGate,
    window::check_window,
};

/// Parameters for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Working electrode offset (mV)
    pub offset: f64,
    /// Working electrode sensitivity (mV per output unit), non-zero
    pub sensitivity: f64,
    /// Moving-average window for temperature (s)
    pub temperature_window: usize,
    /// Moving-average window for the electrodes (s)
    pub average_window: usize,
    /// Moving standard deviation window for the gate (s)
    pub std_window: usize,
    /// Gate threshold on the moving standard deviation (mV), non-negative
    pub std_threshold: f64,
    /// Output blanked after a gate trip (s)
    pub recovery_duration: usize,
    /// Report the resilient calibration as the primary output
    pub resilient: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            offset: DEFAULT_WE_OFFSET_MV,
            sensitivity: DEFAULT_WE_SENSITIVITY,
            temperature_window: DEFAULT_TEMPERATURE_WINDOW_S,
            average_window: DEFAULT_AVERAGE_WINDOW_S,
            std_window: DEFAULT_STD_WINDOW_S,
            std_threshold: DEFAULT_STD_THRESHOLD_MV,
            recovery_duration: DEFAULT_RECOVERY_S,
            resilient: false,
        }
    }
}

impl PipelineConfig {
    /// Set offset and sensitivity
    pub fn with_calibration(mut self, offset: f64, sensitivity: f64) -> Self {
        self.offset = offset;
        self.sensitivity = sensitivity;
        self
    }

    /// Set the electrode average, standard deviation and temperature windows
    pub fn with_windows(mut self, average: usize, std: usize, temperature: usize) -> Self {
        self.average_window = average;
        self.std_window = std;
        self.temperature_window = temperature;
        self
    }

    /// Set the gate threshold and recovery duration
    pub fn with_gate(mut self, std_threshold: f64, recovery_duration: usize) -> Self {
        self.std_threshold = std_threshold;
        self.recovery_duration = recovery_duration;
        self
    }

    /// Choose the primary calibration variant
    pub fn with_resilient(mut self, resilient: bool) -> Self {
        self.resilient = resilient;
        self
    }

    /// Check every parameter that does not depend on the series length
    pub fn validate(&self) -> PipelineResult<()> {
        let result = self.check();
        if let Err(e) = &result {
            log_warn!("Rejected pipeline configuration: {}", e);
        }
        result
    }

    fn check(&self) -> PipelineResult<()> {
        // Length is not known yet; report zero windows against length 0
        for window in [self.average_window, self.std_window, self.temperature_window] {
            if window == 0 {
                return Err(PipelineError::InvalidWindow { window, length: 0 });
            }
        }
        self.calibration()?;
        self.quality_gate()?;
        Ok(())
    }

    /// Check that every window leaves output on a series of `length` seconds
    pub fn check_length(&self, length: usize) -> PipelineResult<()> {
        check_window(self.average_window, length)?;
        check_window(self.std_window, length)?;
        check_window(self.temperature_window, length)
    }

    /// Calibration built from `offset` and `sensitivity`
    pub fn calibration(&self) -> PipelineResult<Calibration> {
        Calibration::new(self.offset, self.sensitivity)
    }

    /// Quality gate built from the window and gate parameters
    pub fn quality_gate(&self) -> PipelineResult<QualityGate> {
        QualityGate::new(
            self.average_window,
            self.std_window,
            self.std_threshold,
            self.recovery_duration,
        )
    }

    /// Primary calibration variant
    pub fn mode(&self) -> CalibrationMode {
        CalibrationMode::from_resilient(self.resilient)
    }

    /// Parse and validate a JSON configuration; missing keys take defaults
    #[cfg(feature = "std")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Failure to load a configuration document
#[cfg(feature = "std")]
#[derive(Debug, thiserror_no_std::Error)]
pub enum ConfigError {
    /// Not valid JSON, or wrong field types
    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Well-formed but out of range
    #[error("{0}")]
    Invalid(#[from] PipelineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.average_window, 15);
        assert_eq!(config.std_window, 60);
        assert_eq!(config.temperature_window, 60);
        assert_eq!(config.recovery_duration, 600);
        assert_eq!(config.mode(), CalibrationMode::Standard);
    }

    #[test]
    fn zero_sensitivity_is_invalid_config() {
        let config = PipelineConfig::default().with_calibration(226.0, 0.0);
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig { .. })));
    }

    #[test]
    fn zero_recovery_is_invalid_config() {
        let config = PipelineConfig::default().with_gate(0.8, 0);
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig { .. })));
    }

    #[test]
    fn zero_window_is_invalid_window() {
        let config = PipelineConfig::default().with_windows(15, 0, 60);
        assert_eq!(
            config.validate(),
            Err(PipelineError::InvalidWindow { window: 0, length: 0 })
        );
    }

    #[test]
    fn length_check_covers_all_windows() {
        let config = PipelineConfig::default().with_windows(5, 10, 30);
        assert!(config.check_length(31).is_ok());
        assert_eq!(
            config.check_length(30),
            Err(PipelineError::InvalidWindow { window: 30, length: 30 })
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_overrides_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{ "offset": 226.0, "sensitivity": 0.3, "resilient": true }"#,
        )
        .unwrap();
        assert_eq!(config.offset, 226.0);
        assert_eq!(config.sensitivity, 0.3);
        assert!(config.resilient);
        assert_eq!(config.average_window, 15);
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_validation_applies() {
        let err = PipelineConfig::from_json_str(r#"{ "sensitivity": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(PipelineError::InvalidConfig { .. })));

        let err = PipelineConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[cfg(feature = "std")]
    #[test]
    fn config_error_exposes_source() {
        use std::error::Error as _;

        let err = PipelineConfig::from_json_str("not json").unwrap_err();
        assert!(err.to_string().starts_with("Configuration parse error: "));
        assert!(err.source().is_some());

        let err = PipelineConfig::from_json_str(r#"{ "recovery_duration": 0 }"#).unwrap_err();
        let inner = PipelineConfig { recovery_duration: 0, ..PipelineConfig::default() }
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), inner.to_string());
        assert!(err.source().is_some());
    }
}
