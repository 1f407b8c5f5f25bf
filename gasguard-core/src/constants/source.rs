//! Logger Export Format
//!
//! The logger writes one comma-separated row per reading with a header row.
//! Only the columns below are read; any others are ignored.

/// Date column, `dd/mm/YYYY`.
pub const COLUMN_DATE: &str = "Date";

/// Time column, `HH:MM:SS`.
pub const COLUMN_TIME: &str = "Time";

/// Light source drive voltage column (V).
pub const COLUMN_LASER_V: &str = "LASER-V";

/// Working electrode column (mV).
pub const COLUMN_WE_MV: &str = "WE-mv";

/// Auxiliary electrode column (mV).
pub const COLUMN_AUX_MV: &str = "AUX-mv";

/// Temperature column (°C).
pub const COLUMN_TEMP: &str = "Temp";

/// `chrono` format of the date column.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// `chrono` format of the time column.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Drive voltage above which the light source counts as on (V).
pub const ILLUMINATION_THRESHOLD_V: f64 = 1.99;

/// Maximum number of columns in one row.
pub const MAX_CSV_FIELDS: usize = 32;
