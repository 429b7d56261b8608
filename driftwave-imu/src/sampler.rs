//! Multi-Rate Sampling Scheduler and Report Pipeline
//!
//! ## Overview
//!
//! This module is the heart of the crate: a fixed-cadence scheduler that
//! drives three nested sampling loops from one monotonic clock and reduces
//! their output into a per-report orientation-and-acceleration reading.
//!
//! ```text
//! inertial @ 1 kHz ──┐                       ┌─ accel NED ─┐
//!                    ├─→ raw buffers ─→ n-sigma mean ─→ attitude filter
//! magnetometer @ 100 Hz ┘   (per fusion cycle)      │      │
//!                                                   ▼      ▼
//!                              fused buffers ←─ NED rotation, angles
//!                                   │  (per report, 20 entries)
//!                                   ▼
//!                              n-sigma mean ─→ ImuReading (1 Hz)
//! ```
//!
//! ## Cadence Model
//!
//! Every loop owns a timing cursor that only ever advances by exact
//! multiples of its nominal period, never snapped to "now". When a cycle
//! runs late the cursor falls behind the clock and the subsequent checks
//! fire back-to-back until it catches up, so the *long-run* rate stays
//! constant through transient overload. Overruns are recorded in
//! [`ReportStats`] for operators watching for sensor-rate degradation;
//! nothing aborts mid-cycle.
//!
//! The whole pipeline is single-threaded and busy-polls the injected
//! [`Clock`]: no sleeping, no yielding. An unresponsive driver therefore
//! blocks the system indefinitely, a known property of this design, not
//! mitigated here. The clock is the only suspension mechanism, which keeps
//! every timing decision reproducible under a deterministic test clock.
//!
//! ## Buffer Lifecycle
//!
//! Raw and fused buffers follow a strict clear → append → reduce lifecycle
//! inside their owning cycle. No sample ever crosses a cycle boundary, and
//! a buffer that reaches its reduction empty surfaces
//! [`SamplerError::EmptyBuffer`] rather than a fabricated zero.
//!
//! ## Failure Semantics
//!
//! An inertial read failure is terminal for the report in progress: the
//! error propagates out of [`ImuSampler::next_reading`] with no outputs and
//! with the report cursor unmoved, and the caller decides when to retry.
//! Magnetometer failures follow the configured [`MagFailurePolicy`].
//! After a stall much longer than a report period, catch-up cycles may run
//! with zero wait and surface `EmptyBuffer` until the fusion cursor has
//! caught back up; the sampler recovers by itself as the cursors drain.

use heapless::Vec;
use nalgebra::Vector3;

use crate::{
    config::{MagFailurePolicy, SamplerConfig},
    constants::{
        buffers::{FUSED_SAMPLE_CAPACITY, RAW_SAMPLE_CAPACITY},
        imu::RAD_TO_DEG,
        time::CADENCE_LAG_WARN_DIVISOR,
    },
    errors::{SamplerError, SamplerResult},
    filter::SigmaMeanFilter,
    rotation,
    time::{elapsed_us, Clock, Timestamp},
    traits::{
        AttitudeFilter, InertialSensor, LivenessWatchdog, Magnetometer, NoIndicator, NoWatchdog,
        StatusIndicator,
    },
};

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// One fused reading handed to downstream consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuReading {
    /// Mean acceleration in the navigation (North-East-Down) frame, m/s²
    pub accel_ned: Vector3<f32>,
    /// Mean yaw over the report interval, degrees
    pub yaw: f32,
    /// Mean pitch over the report interval, degrees
    pub pitch: f32,
    /// Mean roll over the report interval, degrees
    pub roll: f32,
}

/// Diagnostics for the most recent report attempt
///
/// Counters reset at the start of every report. Diagnostics only; no
/// control decision reads them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportStats {
    /// Accelerometer/gyroscope reads performed
    pub inertial_reads: u32,
    /// Successful magnetometer reads performed
    pub magnetometer_reads: u32,
    /// Fusion cycles completed
    pub fusion_updates: u32,
    /// Magnetometer reads that failed (tolerated or fatal)
    pub magnetometer_dropouts: u32,
    /// Raw samples discarded because a buffer was at capacity
    pub raw_samples_dropped: u32,
    /// Largest observed fusion-cycle overrun beyond its nominal period, µs
    pub max_fusion_lag_us: u64,
    /// Report-cursor lag beyond the nominal period at report entry, µs
    /// (recorded only past the 1.2x warning threshold)
    pub report_lag_us: u64,
}

/// Triple of append-only sample buffers, one per axis
struct AxisBuffers<const N: usize> {
    x: Vec<f32, N>,
    y: Vec<f32, N>,
    z: Vec<f32, N>,
}

impl<const N: usize> AxisBuffers<N> {
    const fn new() -> Self {
        Self { x: Vec::new(), y: Vec::new(), z: Vec::new() }
    }

    fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
    }

    /// Append one vector sample; returns how many components were dropped
    /// because the buffer was full.
    fn push(&mut self, v: Vector3<f32>) -> u32 {
        let mut dropped = 0;
        if self.x.push(v.x).is_err() {
            dropped += 1;
        }
        if self.y.push(v.y).is_err() {
            dropped += 1;
        }
        if self.z.push(v.z).is_err() {
            dropped += 1;
        }
        dropped
    }

    fn reduce(
        &self,
        filter: &SigmaMeanFilter,
        channel: &'static str,
    ) -> SamplerResult<Vector3<f32>> {
        let x = filter.reduce(&self.x).map_err(|_| SamplerError::EmptyBuffer { channel })?;
        let y = filter.reduce(&self.y).map_err(|_| SamplerError::EmptyBuffer { channel })?;
        let z = filter.reduce(&self.z).map_err(|_| SamplerError::EmptyBuffer { channel })?;
        Ok(Vector3::new(x, y, z))
    }
}

/// Multi-rate IMU sampler
///
/// Owns every accumulation buffer and timing cursor for the pipeline, the
/// sensor drivers, the attitude filter and the clock. Collaborators are
/// injected as capabilities so the same cadence logic runs on hardware and
/// under a deterministic test clock.
///
/// The watchdog and status indicator default to no-ops; attach real ones
/// with [`ImuSampler::with_watchdog`] and [`ImuSampler::with_indicator`].
pub struct ImuSampler<I, M, F, C, W = NoWatchdog, S = NoIndicator> {
    config: SamplerConfig,
    filter: SigmaMeanFilter,

    inertial: I,
    magnetometer: M,
    attitude: F,
    clock: C,
    watchdog: W,
    indicator: S,

    raw_accel: AxisBuffers<RAW_SAMPLE_CAPACITY>,
    raw_gyro: AxisBuffers<RAW_SAMPLE_CAPACITY>,
    raw_mag: AxisBuffers<RAW_SAMPLE_CAPACITY>,

    fused_ned: AxisBuffers<FUSED_SAMPLE_CAPACITY>,
    fused_yaw: Vec<f32, FUSED_SAMPLE_CAPACITY>,
    fused_pitch: Vec<f32, FUSED_SAMPLE_CAPACITY>,
    fused_roll: Vec<f32, FUSED_SAMPLE_CAPACITY>,

    last_inertial_us: Timestamp,
    last_magnetometer_us: Timestamp,
    last_fusion_us: Timestamp,
    last_report_us: Timestamp,

    stats: ReportStats,
    blink_counter: i32,
}

impl<I, M, F, C> ImuSampler<I, M, F, C>
where
    I: InertialSensor,
    M: Magnetometer,
    F: AttitudeFilter,
    C: Clock,
{
    /// Create a sampler with validated configuration.
    ///
    /// All timing cursors start at the clock's current value, so the first
    /// report spans one full nominal period from construction.
    pub fn new(
        config: SamplerConfig,
        inertial: I,
        magnetometer: M,
        attitude: F,
        clock: C,
    ) -> SamplerResult<Self> {
        config.validate()?;
        let start = clock.now_us();
        Ok(Self {
            filter: SigmaMeanFilter::new(config.sigma_multiplier),
            config,
            inertial,
            magnetometer,
            attitude,
            clock,
            watchdog: NoWatchdog,
            indicator: NoIndicator,
            raw_accel: AxisBuffers::new(),
            raw_gyro: AxisBuffers::new(),
            raw_mag: AxisBuffers::new(),
            fused_ned: AxisBuffers::new(),
            fused_yaw: Vec::new(),
            fused_pitch: Vec::new(),
            fused_roll: Vec::new(),
            last_inertial_us: start,
            last_magnetometer_us: start,
            last_fusion_us: start,
            last_report_us: start,
            stats: ReportStats::default(),
            blink_counter: 0,
        })
    }
}

impl<I, M, F, C, W, S> ImuSampler<I, M, F, C, W, S> {
    /// Attach a liveness watchdog, restarted once per successful report
    pub fn with_watchdog<W2: LivenessWatchdog>(self, watchdog: W2) -> ImuSampler<I, M, F, C, W2, S> {
        ImuSampler {
            config: self.config,
            filter: self.filter,
            inertial: self.inertial,
            magnetometer: self.magnetometer,
            attitude: self.attitude,
            clock: self.clock,
            watchdog,
            indicator: self.indicator,
            raw_accel: self.raw_accel,
            raw_gyro: self.raw_gyro,
            raw_mag: self.raw_mag,
            fused_ned: self.fused_ned,
            fused_yaw: self.fused_yaw,
            fused_pitch: self.fused_pitch,
            fused_roll: self.fused_roll,
            last_inertial_us: self.last_inertial_us,
            last_magnetometer_us: self.last_magnetometer_us,
            last_fusion_us: self.last_fusion_us,
            last_report_us: self.last_report_us,
            stats: self.stats,
            blink_counter: self.blink_counter,
        }
    }

    /// Attach a status indicator driven on the report duty cycle
    pub fn with_indicator<S2: StatusIndicator>(self, indicator: S2) -> ImuSampler<I, M, F, C, W, S2> {
        ImuSampler {
            config: self.config,
            filter: self.filter,
            inertial: self.inertial,
            magnetometer: self.magnetometer,
            attitude: self.attitude,
            clock: self.clock,
            watchdog: self.watchdog,
            indicator,
            raw_accel: self.raw_accel,
            raw_gyro: self.raw_gyro,
            raw_mag: self.raw_mag,
            fused_ned: self.fused_ned,
            fused_yaw: self.fused_yaw,
            fused_pitch: self.fused_pitch,
            fused_roll: self.fused_roll,
            last_inertial_us: self.last_inertial_us,
            last_magnetometer_us: self.last_magnetometer_us,
            last_fusion_us: self.last_fusion_us,
            last_report_us: self.last_report_us,
            stats: self.stats,
            blink_counter: self.blink_counter,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Diagnostics for the most recent report attempt
    pub fn stats(&self) -> &ReportStats {
        &self.stats
    }

    /// Timing cursor of the last completed report
    pub fn report_cursor_us(&self) -> Timestamp {
        self.last_report_us
    }

    /// Timing cursor of the last completed fusion cycle
    pub fn fusion_cursor_us(&self) -> Timestamp {
        self.last_fusion_us
    }

    /// Timing cursor of the last inertial read
    pub fn inertial_cursor_us(&self) -> Timestamp {
        self.last_inertial_us
    }

    /// Timing cursor of the last magnetometer read
    pub fn magnetometer_cursor_us(&self) -> Timestamp {
        self.last_magnetometer_us
    }
}

impl<I, M, F, C, W, S> ImuSampler<I, M, F, C, W, S>
where
    I: InertialSensor,
    M: Magnetometer,
    F: AttitudeFilter,
    C: Clock,
    W: LivenessWatchdog,
    S: StatusIndicator,
{
    /// Produce the next fused reading.
    ///
    /// Busy-polls until one full report period has elapsed since the report
    /// cursor, running fusion cycles back to back, then reduces the fused
    /// buffers into one [`ImuReading`]. On success the report cursor
    /// advances by exactly one nominal period and the watchdog is
    /// restarted. On failure nothing is returned, the cursor stays put and
    /// the caller retries on its next scheduling tick.
    pub fn next_reading(&mut self) -> SamplerResult<ImuReading> {
        self.drive_indicator();

        self.fused_ned.clear();
        self.fused_yaw.clear();
        self.fused_pitch.clear();
        self.fused_roll.clear();
        self.stats = ReportStats::default();

        let behind = elapsed_us(self.clock.now_us(), self.last_report_us);
        let warn_at =
            self.config.report_period_us + self.config.report_period_us / CADENCE_LAG_WARN_DIVISOR;
        if behind > warn_at {
            let lag = behind - self.config.report_period_us;
            self.stats.report_lag_us = lag;
            log_warn!("report cycle behind nominal cadence by {} us", lag);
        }

        // At least one fusion cycle per report, then poll the budget.
        loop {
            self.accumulate_fusion_cycle()?;
            let now = self.clock.now_us();
            if elapsed_us(now, self.last_report_us) >= self.config.report_period_us {
                break;
            }
        }
        self.last_report_us = self.last_report_us.wrapping_add(self.config.report_period_us);

        let accel_ned = self.fused_ned.reduce(&self.filter, "fused acceleration")?;
        let yaw = self
            .filter
            .reduce(&self.fused_yaw)
            .map_err(|_| SamplerError::EmptyBuffer { channel: "fused yaw" })?;
        let pitch = self
            .filter
            .reduce(&self.fused_pitch)
            .map_err(|_| SamplerError::EmptyBuffer { channel: "fused pitch" })?;
        let roll = self
            .filter
            .reduce(&self.fused_roll)
            .map_err(|_| SamplerError::EmptyBuffer { channel: "fused roll" })?;

        self.watchdog.restart();

        Ok(ImuReading { accel_ned, yaw, pitch, roll })
    }

    /// Run one fusion cycle: accumulate raw samples at their own cadences
    /// for one fusion period, reduce, feed the attitude filter and append
    /// the fused outputs.
    fn accumulate_fusion_cycle(&mut self) -> SamplerResult<()> {
        self.raw_accel.clear();
        self.raw_gyro.clear();
        self.raw_mag.clear();

        // Perform as many sensor reads as their cadences call for while the
        // fusion budget lasts. One clock read per poll; both sub-cadences
        // are checked against the same timestamp, inertial first.
        loop {
            let now = self.clock.now_us();

            let cycle_elapsed = elapsed_us(now, self.last_fusion_us);
            if cycle_elapsed >= self.config.fusion_period_us {
                let lag = cycle_elapsed - self.config.fusion_period_us;
                if lag > self.stats.max_fusion_lag_us {
                    self.stats.max_fusion_lag_us = lag;
                }
                break;
            }

            if elapsed_us(now, self.last_inertial_us) > self.config.inertial_period_us {
                self.last_inertial_us =
                    self.last_inertial_us.wrapping_add(self.config.inertial_period_us);
                let sample = self.inertial.read_inertial().map_err(|fault| {
                    SamplerError::SensorRead { channel: "inertial", reason: fault.reason }
                })?;
                self.stats.raw_samples_dropped += self.raw_accel.push(sample.accel);
                self.stats.raw_samples_dropped += self.raw_gyro.push(sample.gyro);
                self.stats.inertial_reads += 1;
            }

            if elapsed_us(now, self.last_magnetometer_us) > self.config.magnetometer_period_us {
                self.last_magnetometer_us =
                    self.last_magnetometer_us.wrapping_add(self.config.magnetometer_period_us);
                match self.magnetometer.read_magnetic() {
                    Ok(sample) => {
                        self.stats.raw_samples_dropped += self.raw_mag.push(sample.field);
                        self.stats.magnetometer_reads += 1;
                    }
                    Err(fault) => {
                        self.stats.magnetometer_dropouts += 1;
                        if self.config.mag_failure_policy == MagFailurePolicy::Fatal {
                            return Err(SamplerError::SensorRead {
                                channel: "magnetometer",
                                reason: fault.reason,
                            });
                        }
                    }
                }
            }
        }
        self.last_fusion_us = self.last_fusion_us.wrapping_add(self.config.fusion_period_us);

        let accel = self.raw_accel.reduce(&self.filter, "accel")?;
        let gyro_dps = self.raw_gyro.reduce(&self.filter, "gyro")? * RAD_TO_DEG;
        let mag = self.raw_mag.reduce(&self.filter, "magnetometer")?;

        // An uncalibrated magnetometer biases the estimate worse than
        // omitting it, so a disabled magnetometer feeds zero field.
        let mag_input = if self.config.use_magnetometer { mag } else { Vector3::zeros() };
        self.attitude.update(gyro_dps, accel, mag_input);

        let orientation = self.attitude.quaternion();
        let accel_ned = rotation::body_to_ned(&orientation, accel);

        self.stats.raw_samples_dropped += self.fused_ned.push(accel_ned);
        if self.fused_yaw.push(self.attitude.yaw()).is_err()
            || self.fused_pitch.push(self.attitude.pitch()).is_err()
            || self.fused_roll.push(self.attitude.roll()).is_err()
        {
            self.stats.raw_samples_dropped += 1;
        }
        self.stats.fusion_updates += 1;

        Ok(())
    }

    /// Status-indicator duty cycle: driven low on the report where the
    /// counter is zero, high once the counter reaches the configured count,
    /// then the sequence restarts. Cosmetic side effect only.
    fn drive_indicator(&mut self) {
        if self.config.indicator_enabled {
            if self.blink_counter == 0 {
                self.indicator.set_active(false);
            }
            if self.blink_counter >= self.config.reports_per_blink as i32 {
                self.blink_counter = -1;
                self.indicator.set_active(true);
            }
        }
        self.blink_counter += 1;
    }
}
