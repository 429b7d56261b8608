//! Deterministic collaborator doubles for integration tests
//!
//! Every double is scriptable and records what the sampler did to it, so
//! scheduling behavior can be asserted down to individual reads without any
//! real hardware or wall-clock time.

use std::cell::Cell;
use std::rc::Rc;

use driftwave_imu::{
    AttitudeFilter, InertialSample, InertialSensor, LivenessWatchdog, MagneticSample,
    Magnetometer, SensorFault, StatusIndicator,
};
use nalgebra::{UnitQuaternion, Vector3};

/// Inertial driver returning a constant sample, optionally failing on one
/// specific call (1-based).
pub struct ScriptedInertial {
    pub fail_on_call: Option<u32>,
    calls: u32,
}

impl ScriptedInertial {
    pub fn steady() -> Self {
        Self { fail_on_call: None, calls: 0 }
    }

    pub fn failing_on(call: u32) -> Self {
        Self { fail_on_call: Some(call), calls: 0 }
    }
}

impl InertialSensor for ScriptedInertial {
    fn read_inertial(&mut self) -> Result<InertialSample, SensorFault> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(SensorFault::new("bus timeout"));
        }
        Ok(InertialSample {
            accel: Vector3::new(0.0, 0.0, 9.81),
            gyro: Vector3::new(0.02, -0.01, 0.005),
            temperature: 18.0,
        })
    }
}

/// Magnetometer double failing every `fail_every`-th call (0 = never,
/// `u32::MAX`-style always via `dead()`).
pub struct ScriptedMagnetometer {
    fail_every: u32,
    always_fail: bool,
    calls: u32,
}

impl ScriptedMagnetometer {
    pub fn steady() -> Self {
        Self { fail_every: 0, always_fail: false, calls: 0 }
    }

    pub fn flaky(fail_every: u32) -> Self {
        Self { fail_every, always_fail: false, calls: 0 }
    }

    pub fn dead() -> Self {
        Self { fail_every: 0, always_fail: true, calls: 0 }
    }
}

impl Magnetometer for ScriptedMagnetometer {
    fn read_magnetic(&mut self) -> Result<MagneticSample, SensorFault> {
        self.calls += 1;
        if self.always_fail || (self.fail_every != 0 && self.calls % self.fail_every == 0) {
            return Err(SensorFault::new("no response"));
        }
        Ok(MagneticSample { field: Vector3::new(21.0, 4.5, -44.0) })
    }
}

/// Attitude double holding a fixed orientation
pub struct FixedAttitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub orientation: UnitQuaternion<f32>,
}

impl FixedAttitude {
    pub fn level() -> Self {
        Self { roll: 0.0, pitch: 0.0, yaw: 0.0, orientation: UnitQuaternion::identity() }
    }

    pub fn with_orientation(orientation: UnitQuaternion<f32>) -> Self {
        Self { roll: 0.0, pitch: 0.0, yaw: 0.0, orientation }
    }
}

impl AttitudeFilter for FixedAttitude {
    fn update(&mut self, _gyro_dps: Vector3<f32>, _accel: Vector3<f32>, _mag: Vector3<f32>) {}

    fn roll(&self) -> f32 {
        self.roll
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn quaternion(&self) -> UnitQuaternion<f32> {
        self.orientation
    }
}

/// Watchdog double counting restarts through a shared handle
#[derive(Clone, Default)]
pub struct CountingWatchdog {
    pub restarts: Rc<Cell<u32>>,
}

impl LivenessWatchdog for CountingWatchdog {
    fn restart(&mut self) {
        self.restarts.set(self.restarts.get() + 1);
    }
}

/// Indicator double counting transitions through shared handles
#[derive(Clone, Default)]
pub struct CountingIndicator {
    pub ons: Rc<Cell<u32>>,
    pub offs: Rc<Cell<u32>>,
}

impl StatusIndicator for CountingIndicator {
    fn set_active(&mut self, on: bool) {
        if on {
            self.ons.set(self.ons.get() + 1);
        } else {
            self.offs.set(self.offs.get() + 1);
        }
    }
}
