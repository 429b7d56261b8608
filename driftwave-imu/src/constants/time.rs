//! Cadence defaults and timing thresholds
//!
//! All periods are expressed in microseconds to match the monotonic clock
//! resolution used by the sampling loops. The defaults reproduce the cadence
//! stack of the reference buoy deployment: a 1 kHz inertial stream, a 100 Hz
//! magnetometer stream, a 20 Hz orientation update and a 1 Hz report.

/// Microseconds per millisecond.
pub const US_PER_MS: u64 = 1_000;

/// Microseconds per second.
pub const US_PER_SECOND: u64 = 1_000_000;

/// Default accelerometer/gyroscope polling period (1 kHz).
pub const DEFAULT_INERTIAL_PERIOD_US: u64 = 1_000;

/// Default magnetometer polling period (100 Hz).
pub const DEFAULT_MAGNETOMETER_PERIOD_US: u64 = 10_000;

/// Default attitude-filter update period (20 Hz).
pub const DEFAULT_FUSION_PERIOD_US: u64 = 50_000;

/// Default report period handed to downstream consumers (1 Hz).
pub const DEFAULT_REPORT_PERIOD_US: u64 = US_PER_SECOND;

/// Lag-warning threshold divisor.
///
/// A cycle is reported as behind its cadence once the elapsed time exceeds
/// `period + period / CADENCE_LAG_WARN_DIVISOR`, i.e. 1.2x nominal.
pub const CADENCE_LAG_WARN_DIVISOR: u64 = 5;
