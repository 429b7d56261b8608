//! Simulated buoy: one minute of readings without hardware
//!
//! Wires the sampler to synthetic drivers and a stepping clock, so a full
//! report pipeline runs in milliseconds of real time. Useful as a wiring
//! reference and for eyeballing the cadence accounting.
//!
//! Run with: cargo run --example simulated_buoy

use driftwave_imu::{
    AttitudeFilter, ImuSampler, InertialSample, InertialSensor, MagneticSample, Magnetometer,
    SamplerConfig, SensorFault, StepClock,
};
use nalgebra::{UnitQuaternion, Vector3};

/// Inertial driver synthesizing gentle swell: gravity plus a slow heave
/// oscillation and a noise-free roll rate.
struct SwellInertial {
    phase: f32,
}

impl InertialSensor for SwellInertial {
    fn read_inertial(&mut self) -> Result<InertialSample, SensorFault> {
        self.phase += 0.002;
        let heave = 0.6 * self.phase.sin();
        Ok(InertialSample {
            accel: Vector3::new(0.0, 0.1 * self.phase.cos(), 9.81 + heave),
            gyro: Vector3::new(0.03 * self.phase.cos(), 0.0, 0.0),
            temperature: 12.0,
        })
    }
}

struct CalmFieldMagnetometer;

impl Magnetometer for CalmFieldMagnetometer {
    fn read_magnetic(&mut self) -> Result<MagneticSample, SensorFault> {
        Ok(MagneticSample { field: Vector3::new(18.3, 0.4, -45.1) })
    }
}

/// Stand-in estimator: tracks a roll angle by integrating the roll rate at
/// its update cadence. A real deployment plugs a Kalman or complementary
/// filter in here.
struct RollIntegrator {
    roll_deg: f32,
    dt_s: f32,
}

impl AttitudeFilter for RollIntegrator {
    fn update(&mut self, gyro_dps: Vector3<f32>, _accel: Vector3<f32>, _mag: Vector3<f32>) {
        self.roll_deg += gyro_dps.x * self.dt_s;
    }

    fn roll(&self) -> f32 {
        self.roll_deg
    }

    fn pitch(&self) -> f32 {
        0.0
    }

    fn yaw(&self) -> f32 {
        0.0
    }

    fn quaternion(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(self.roll_deg.to_radians(), 0.0, 0.0)
    }
}

fn main() {
    let config = SamplerConfig::default();
    let attitude = RollIntegrator { roll_deg: 0.0, dt_s: config.fusion_period_us as f32 / 1e6 };

    // 100 µs of simulated time per clock poll.
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        config,
        SwellInertial { phase: 0.0 },
        CalmFieldMagnetometer,
        attitude,
        clock,
    )
    .expect("default configuration is valid");

    println!("second | accel NED (m/s^2)          | roll (deg) | reads (inertial/mag)");
    for second in 1..=60 {
        match sampler.next_reading() {
            Ok(reading) => {
                let stats = sampler.stats();
                println!(
                    "{second:>6} | {:+6.2} {:+6.2} {:+6.2} | {:+9.3} | {}/{}",
                    reading.accel_ned.x,
                    reading.accel_ned.y,
                    reading.accel_ned.z,
                    reading.roll,
                    stats.inertial_reads,
                    stats.magnetometer_reads,
                );
            }
            Err(e) => {
                eprintln!("report {second} failed: {e}");
                break;
            }
        }
    }
}
