//! Multi-rate IMU sampling core for drifting wave buoys
//!
//! Reads an accelerometer/gyroscope stream and a magnetometer stream at
//! their own hardware cadences, reduces each burst with outlier-robust
//! averaging, drives an attitude filter at a third cadence and hands the
//! caller a lower-rate orientation-and-NED-acceleration report suitable for
//! wave-height integration.
//!
//! Key constraints:
//! - Runs on small battery-powered boards: `no_std`, no heap in the hot path
//! - Single-threaded cooperative polling against an injected monotonic clock
//! - Constant long-run cadence: timing cursors advance by exact nominal
//!   periods, never snapped to the current time
//!
//! ```no_run
//! use driftwave_imu::{ImuSampler, SamplerConfig, SystemClock};
//! # use driftwave_imu::{AttitudeFilter, InertialSensor, InertialSample,
//! #     Magnetometer, MagneticSample, SensorFault};
//! # use nalgebra::{UnitQuaternion, Vector3};
//! # struct Imu; struct Mag; struct Ahrs;
//! # impl InertialSensor for Imu {
//! #     fn read_inertial(&mut self) -> Result<InertialSample, SensorFault> { unimplemented!() }
//! # }
//! # impl Magnetometer for Mag {
//! #     fn read_magnetic(&mut self) -> Result<MagneticSample, SensorFault> { unimplemented!() }
//! # }
//! # impl AttitudeFilter for Ahrs {
//! #     fn update(&mut self, _: Vector3<f32>, _: Vector3<f32>, _: Vector3<f32>) {}
//! #     fn roll(&self) -> f32 { 0.0 }
//! #     fn pitch(&self) -> f32 { 0.0 }
//! #     fn yaw(&self) -> f32 { 0.0 }
//! #     fn quaternion(&self) -> UnitQuaternion<f32> { UnitQuaternion::identity() }
//! # }
//!
//! let mut sampler = ImuSampler::new(
//!     SamplerConfig::default(),
//!     Imu,          // accelerometer/gyroscope driver
//!     Mag,          // magnetometer driver
//!     Ahrs,         // attitude filter
//!     SystemClock::new(),
//! )?;
//!
//! loop {
//!     match sampler.next_reading() {
//!         Ok(reading) => { /* integrate reading.accel_ned, log angles */ }
//!         Err(e) => { /* report failed, retry on the next tick */ }
//!     }
//! }
//! # Ok::<(), driftwave_imu::SamplerError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod rotation;
pub mod sampler;
pub mod time;
pub mod traits;

// Public API
pub use config::{MagFailurePolicy, SamplerConfig};
pub use errors::{SamplerError, SamplerResult};
pub use filter::{FilterError, SigmaMeanFilter};
pub use rotation::{body_to_ned, quaternion_from_wxyz};
pub use sampler::{ImuReading, ImuSampler, ReportStats};
#[cfg(feature = "std")]
pub use time::SystemClock;
pub use time::{elapsed_us, Clock, StepClock, Timestamp};
pub use traits::{
    AttitudeFilter, InertialSample, InertialSensor, LivenessWatchdog, MagneticSample,
    Magnetometer, NoIndicator, NoWatchdog, SensorFault, StatusIndicator,
};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
