//! Window Lengths and Quality-Gate Parameters
//!
//! All durations are in seconds, which equals positions in the aggregated
//! 1 Hz series.

// ===== MOVING WINDOWS =====

/// Moving-average window for the electrode channels (seconds).
pub const DEFAULT_AVERAGE_WINDOW_S: usize = 15;

/// Moving standard deviation window for the working electrode (seconds).
pub const DEFAULT_STD_WINDOW_S: usize = 60;

/// Moving-average window for temperature (seconds).
pub const DEFAULT_TEMPERATURE_WINDOW_S: usize = 60;

// ===== GATE =====

/// Standard deviation at or above which the working electrode is considered
/// disturbed (mV).
pub const DEFAULT_STD_THRESHOLD_MV: f64 = 0.8;

/// Output blanked after a disturbance is detected (seconds).
pub const DEFAULT_RECOVERY_S: usize = 600;
