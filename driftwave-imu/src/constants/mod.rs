//! Constants for the Driftwave sampling core
//!
//! Centralized numeric values used throughout the crate, grouped by domain:
//! - **Time**: cadence defaults and lag-warning thresholds
//! - **Imu**: unit conversions and filter defaults
//! - **Buffers**: accumulation buffer capacities
//!
//! Always use these constants instead of magic numbers, and include units in
//! the constant name where the type does not carry them.

/// Cadence defaults and timing thresholds.
pub mod time;

/// Unit conversions and statistical filter defaults.
pub mod imu;

/// Accumulation buffer capacities for the sampling core.
pub mod buffers;

pub use time::{
    DEFAULT_INERTIAL_PERIOD_US, DEFAULT_MAGNETOMETER_PERIOD_US,
    DEFAULT_FUSION_PERIOD_US, DEFAULT_REPORT_PERIOD_US,
};
pub use imu::{RAD_TO_DEG, DEFAULT_SIGMA_MULTIPLIER};
pub use buffers::{RAW_SAMPLE_CAPACITY, FUSED_SAMPLE_CAPACITY};
