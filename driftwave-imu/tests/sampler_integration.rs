//! Integration tests for the multi-rate sampling pipeline
//!
//! Drives full report cycles against a deterministic step clock and
//! scripted drivers, asserting the cadence accounting end to end.

mod common;

use common::{
    CountingIndicator, CountingWatchdog, FixedAttitude, ScriptedInertial, ScriptedMagnetometer,
};
use driftwave_imu::{
    ImuSampler, MagFailurePolicy, SamplerConfig, SamplerError, StepClock,
};
use nalgebra::UnitQuaternion;
use std::rc::Rc;

/// The reference cadence stack: 1 kHz inertial, 100 Hz magnetometer,
/// 20 Hz fusion, 1 Hz report, magnetometer disabled.
fn reference_config() -> SamplerConfig {
    SamplerConfig {
        inertial_period_us: 1_000,
        magnetometer_period_us: 10_000,
        fusion_period_us: 50_000,
        report_period_us: 1_000_000,
        use_magnetometer: false,
        ..Default::default()
    }
}

#[test]
fn nominal_report_performs_expected_cycle_counts() {
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        reference_config(),
        ScriptedInertial::steady(),
        ScriptedMagnetometer::steady(),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap();

    let reading = sampler.next_reading().unwrap();

    // 1 s report at a 50 ms fusion period: exactly 20 fusion cycles.
    let stats = *sampler.stats();
    assert_eq!(stats.fusion_updates, 20);

    // ~50 inertial and ~5 magnetometer reads per cycle.
    assert!(
        (900..=1020).contains(&stats.inertial_reads),
        "inertial reads: {}",
        stats.inertial_reads
    );
    assert!(
        (80..=110).contains(&stats.magnetometer_reads),
        "magnetometer reads: {}",
        stats.magnetometer_reads
    );
    assert_eq!(stats.magnetometer_dropouts, 0);
    assert_eq!(stats.raw_samples_dropped, 0);

    // Six finite outputs.
    assert!(reading.accel_ned.x.is_finite());
    assert!(reading.accel_ned.y.is_finite());
    assert!(reading.accel_ned.z.is_finite());
    assert!(reading.yaw.is_finite());
    assert!(reading.pitch.is_finite());
    assert!(reading.roll.is_finite());

    // Level orientation: NED acceleration is the body measurement.
    assert!((reading.accel_ned.z - 9.81).abs() < 1e-3);

    // Report cursor advanced by exactly one nominal period.
    assert_eq!(sampler.report_cursor_us(), 1_000_000);
}

#[test]
fn cadence_stays_constant_over_consecutive_reports() {
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        reference_config(),
        ScriptedInertial::steady(),
        ScriptedMagnetometer::steady(),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap();

    for n in 1..=5u64 {
        sampler.next_reading().unwrap();
        assert_eq!(sampler.report_cursor_us(), n * 1_000_000);
        assert_eq!(sampler.stats().fusion_updates, 20);
        assert_eq!(sampler.fusion_cursor_us() % 50_000, 0);
        assert_eq!(sampler.inertial_cursor_us() % 1_000, 0);
        assert_eq!(sampler.magnetometer_cursor_us() % 10_000, 0);
    }
}

#[test]
fn inertial_failure_aborts_report_without_advancing_cursor() {
    let watchdog = CountingWatchdog::default();
    let restarts = Rc::clone(&watchdog.restarts);
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        reference_config(),
        ScriptedInertial::failing_on(3),
        ScriptedMagnetometer::steady(),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap()
    .with_watchdog(watchdog);

    let result = sampler.next_reading();
    assert_eq!(
        result.unwrap_err(),
        SamplerError::SensorRead { channel: "inertial", reason: "bus timeout" }
    );

    // Two reads landed before the failure; nothing else happened.
    assert_eq!(sampler.stats().inertial_reads, 2);
    assert_eq!(sampler.report_cursor_us(), 0);
    assert_eq!(restarts.get(), 0);

    // The driver only failed on its third call; the retry completes the
    // report and the cursor advances exactly one period.
    sampler.next_reading().unwrap();
    assert_eq!(sampler.report_cursor_us(), 1_000_000);
    assert_eq!(restarts.get(), 1);
}

#[test]
fn watchdog_restarted_once_per_successful_report() {
    let watchdog = CountingWatchdog::default();
    let restarts = Rc::clone(&watchdog.restarts);
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        reference_config(),
        ScriptedInertial::steady(),
        ScriptedMagnetometer::steady(),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap()
    .with_watchdog(watchdog);

    for _ in 0..3 {
        sampler.next_reading().unwrap();
    }
    assert_eq!(restarts.get(), 3);
}

#[test]
fn magnetometer_dropouts_are_tolerated_and_counted() {
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        reference_config(),
        ScriptedInertial::steady(),
        ScriptedMagnetometer::flaky(2),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap();

    sampler.next_reading().unwrap();
    let stats = *sampler.stats();
    assert!(stats.magnetometer_dropouts > 0);
    assert!(stats.magnetometer_reads > 0);
    // Every attempt is either a read or a dropout.
    assert!(
        (80..=110).contains(&(stats.magnetometer_reads + stats.magnetometer_dropouts)),
        "attempts: {}",
        stats.magnetometer_reads + stats.magnetometer_dropouts
    );
}

#[test]
fn fatal_policy_promotes_magnetometer_failure() {
    let config = SamplerConfig {
        mag_failure_policy: MagFailurePolicy::Fatal,
        ..reference_config()
    };
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        config,
        ScriptedInertial::steady(),
        ScriptedMagnetometer::dead(),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap();

    let result = sampler.next_reading();
    assert_eq!(
        result.unwrap_err(),
        SamplerError::SensorRead { channel: "magnetometer", reason: "no response" }
    );
    assert_eq!(sampler.report_cursor_us(), 0);
}

#[test]
fn dead_magnetometer_surfaces_as_empty_buffer() {
    // Under the tolerant policy a magnetometer that never answers leaves
    // its buffer empty, which must surface as a failure, not a silent zero.
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        reference_config(),
        ScriptedInertial::steady(),
        ScriptedMagnetometer::dead(),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap();

    let result = sampler.next_reading();
    assert_eq!(result.unwrap_err(), SamplerError::EmptyBuffer { channel: "magnetometer" });
    assert!(sampler.stats().magnetometer_dropouts > 0);
}

#[test]
fn orientation_rotates_acceleration_into_ned() {
    // Pitch the buoy 90 degrees: gravity measured on the body z axis must
    // land on the navigation north axis.
    let pitched = UnitQuaternion::from_euler_angles(0.0, core::f32::consts::FRAC_PI_2, 0.0);
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        reference_config(),
        ScriptedInertial::steady(),
        ScriptedMagnetometer::steady(),
        FixedAttitude::with_orientation(pitched),
        &clock,
    )
    .unwrap();

    let reading = sampler.next_reading().unwrap();
    assert!((reading.accel_ned.x - 9.81).abs() < 1e-3, "north: {}", reading.accel_ned.x);
    assert!(reading.accel_ned.y.abs() < 1e-3);
    assert!(reading.accel_ned.z.abs() < 1e-3);
}

#[test]
fn indicator_duty_cycle_is_observable() {
    let indicator = CountingIndicator::default();
    let ons = Rc::clone(&indicator.ons);
    let offs = Rc::clone(&indicator.offs);
    let config = SamplerConfig { reports_per_blink: 2, ..reference_config() };
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        config,
        ScriptedInertial::steady(),
        ScriptedMagnetometer::steady(),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap()
    .with_indicator(indicator);

    for _ in 0..6 {
        sampler.next_reading().unwrap();
    }
    // counter 0 -> off on reports 1 and 4, on after reports 3 and 6.
    assert_eq!(offs.get(), 2);
    assert_eq!(ons.get(), 2);
}

#[test]
fn stall_is_reported_and_recovered_from() {
    let clock = StepClock::new(0, 100);
    let mut sampler = ImuSampler::new(
        reference_config(),
        ScriptedInertial::steady(),
        ScriptedMagnetometer::steady(),
        FixedAttitude::level(),
        &clock,
    )
    .unwrap();

    sampler.next_reading().unwrap();

    // The system goes dark for three seconds (e.g. a blocking peripheral).
    clock.set(clock.peek() + 3_000_000);

    // Catch-up cycles run with zero budget until the fusion cursor drains;
    // those surface empty buffers and the report lag is recorded.
    let first = sampler.next_reading();
    assert!(matches!(first, Err(SamplerError::EmptyBuffer { .. })));
    assert!(sampler.stats().report_lag_us > 0);

    // The sampler recovers by itself as cursors catch up.
    let mut recovered = false;
    for _ in 0..120 {
        if sampler.next_reading().is_ok() {
            recovered = true;
            break;
        }
    }
    assert!(recovered, "sampler did not recover from stall");
}
