//! Collaborator interfaces for the sampling core
//!
//! The core drives four kinds of hardware and one algorithm, all owned by
//! the integrator and injected as capabilities:
//!
//! - [`InertialSensor`] / [`Magnetometer`]: raw register-level drivers.
//! - [`AttitudeFilter`]: the orientation estimator, treated as a black box.
//! - [`LivenessWatchdog`] / [`StatusIndicator`]: board plumbing touched as
//!   side effects of a completed report.
//!
//! Keep implementations thin: the traits exist so the cadence logic can run
//! against real hardware and against deterministic test doubles unchanged.

use nalgebra::{UnitQuaternion, Vector3};

/// Driver-level read failure
///
/// Carries only a static reason string; what to do about the failure is the
/// sampler's decision, not the driver's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorFault {
    /// Driver-supplied description of the failure
    pub reason: &'static str,
}

impl SensorFault {
    /// Create a fault with a static reason
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// One combined accelerometer/gyroscope reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertialSample {
    /// Body-frame acceleration in m/s²
    pub accel: Vector3<f32>,
    /// Body-frame angular rate in rad/s
    pub gyro: Vector3<f32>,
    /// Die temperature in °C
    pub temperature: f32,
}

/// One magnetometer reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticSample {
    /// Magnetic field in µT, body frame
    pub field: Vector3<f32>,
}

/// Combined accelerometer/gyroscope driver
pub trait InertialSensor {
    /// Read one sample. Must be callable at the nominal inertial period.
    fn read_inertial(&mut self) -> Result<InertialSample, SensorFault>;
}

/// Magnetometer driver
pub trait Magnetometer {
    /// Read one sample. Must be callable at the nominal magnetometer period.
    fn read_magnetic(&mut self) -> Result<MagneticSample, SensorFault>;
}

/// Orientation estimator fed by the fusion cycle
///
/// The estimation algorithm is out of scope here; anything exposing this
/// surface works, from a full Kalman filter to a complementary filter. The
/// estimator is expected to know its own update cadence (the fusion period)
/// and to keep its quaternion normalized.
pub trait AttitudeFilter {
    /// Feed one set of reduced measurements: angular rate in deg/s,
    /// acceleration in m/s², magnetic field in µT (zeros when the
    /// magnetometer is disabled).
    fn update(&mut self, gyro_dps: Vector3<f32>, accel: Vector3<f32>, mag: Vector3<f32>);

    /// Current roll estimate in degrees
    fn roll(&self) -> f32;

    /// Current pitch estimate in degrees
    fn pitch(&self) -> f32;

    /// Current yaw estimate in degrees
    fn yaw(&self) -> f32;

    /// Current orientation quaternion (unit)
    fn quaternion(&self) -> UnitQuaternion<f32>;
}

/// External liveness timer, restarted once per successful report
pub trait LivenessWatchdog {
    /// Pet the watchdog
    fn restart(&mut self);
}

/// Binary status output toggled on the report duty cycle
pub trait StatusIndicator {
    /// Drive the indicator on or off
    fn set_active(&mut self, on: bool);
}

/// Watchdog stand-in for builds without one
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWatchdog;

impl LivenessWatchdog for NoWatchdog {
    fn restart(&mut self) {}
}

/// Indicator stand-in for builds without one
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl StatusIndicator for NoIndicator {
    fn set_active(&mut self, _on: bool) {}
}
