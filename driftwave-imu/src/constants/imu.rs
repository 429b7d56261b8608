//! Unit conversions and statistical filter defaults

/// Radians-per-second to degrees-per-second conversion factor.
///
/// Inertial drivers report angular rate in rad/s; the attitude filter
/// consumes deg/s.
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Default n-sigma multiplier for outlier rejection.
///
/// Samples deviating from the burst mean by more than this many standard
/// deviations are excluded from the final average. Two sigma keeps ~95% of
/// Gaussian noise while rejecting the single-sample spikes seen on shared
/// I2C buses.
pub const DEFAULT_SIGMA_MULTIPLIER: f32 = 2.0;
