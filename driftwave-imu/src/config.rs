//! Sampler configuration
//!
//! All cadences are nominal periods in microseconds. The sampler validates a
//! configuration once at construction; a configuration that passes cannot
//! starve an accumulation buffer or overflow one at nominal rates, so the
//! empty-buffer error genuinely indicates a runtime fault rather than a
//! mis-parameterization.

use crate::constants::{
    buffers::{FUSED_SAMPLE_CAPACITY, RAW_SAMPLE_CAPACITY},
    imu::DEFAULT_SIGMA_MULTIPLIER,
    time::{
        DEFAULT_FUSION_PERIOD_US, DEFAULT_INERTIAL_PERIOD_US, DEFAULT_MAGNETOMETER_PERIOD_US,
        DEFAULT_REPORT_PERIOD_US,
    },
};
use crate::errors::{SamplerError, SamplerResult};

/// What to do when a magnetometer read fails
///
/// Makes dropout tolerance an explicit, configurable choice instead of a
/// silent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MagFailurePolicy {
    /// Count the dropout, append nothing, keep the cycle alive (the default;
    /// yaw degrades gracefully while roll/pitch stay usable)
    #[default]
    Tolerate,
    /// Treat the dropout like an inertial read failure: abort the report
    Fatal,
}

/// Cadence and behavior configuration for [`crate::ImuSampler`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerConfig {
    /// Nominal accelerometer/gyroscope read period in µs
    pub inertial_period_us: u64,

    /// Nominal magnetometer read period in µs
    pub magnetometer_period_us: u64,

    /// Nominal attitude-filter update period in µs
    pub fusion_period_us: u64,

    /// Nominal report period in µs
    pub report_period_us: u64,

    /// Feed measured magnetic components to the attitude filter
    ///
    /// Disabled by default: an uncalibrated magnetometer biases the estimate
    /// worse than omitting it. The magnetometer is still sampled on its
    /// cadence either way, so enabling this later changes nothing about
    /// timing behavior.
    pub use_magnetometer: bool,

    /// Policy for magnetometer read failures
    pub mag_failure_policy: MagFailurePolicy,

    /// Drive the status indicator on the report duty cycle
    pub indicator_enabled: bool,

    /// Reports between indicator blinks
    pub reports_per_blink: u32,

    /// n-sigma multiplier for outlier rejection
    pub sigma_multiplier: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            inertial_period_us: DEFAULT_INERTIAL_PERIOD_US,
            magnetometer_period_us: DEFAULT_MAGNETOMETER_PERIOD_US,
            fusion_period_us: DEFAULT_FUSION_PERIOD_US,
            report_period_us: DEFAULT_REPORT_PERIOD_US,
            use_magnetometer: false,
            mag_failure_policy: MagFailurePolicy::default(),
            indicator_enabled: true,
            reports_per_blink: 10,
            sigma_multiplier: DEFAULT_SIGMA_MULTIPLIER,
        }
    }
}

impl SamplerConfig {
    /// Check cadence and filter parameters for consistency.
    ///
    /// Rejected configurations would otherwise fail at runtime in harder to
    /// diagnose ways: a sub-cadence period at or above the fusion period
    /// leaves a raw buffer empty, a fusion period above the report period
    /// starves the fused buffers on the following report, and a nominal
    /// fill count beyond buffer capacity drops samples every single cycle.
    pub fn validate(&self) -> SamplerResult<()> {
        if self.inertial_period_us == 0
            || self.magnetometer_period_us == 0
            || self.fusion_period_us == 0
            || self.report_period_us == 0
        {
            return Err(SamplerError::InvalidConfig { reason: "period must be non-zero" });
        }
        if self.inertial_period_us >= self.fusion_period_us {
            return Err(SamplerError::InvalidConfig {
                reason: "inertial period must be below the fusion period",
            });
        }
        if self.magnetometer_period_us >= self.fusion_period_us {
            return Err(SamplerError::InvalidConfig {
                reason: "magnetometer period must be below the fusion period",
            });
        }
        if self.fusion_period_us > self.report_period_us {
            return Err(SamplerError::InvalidConfig {
                reason: "fusion period must not exceed the report period",
            });
        }
        if self.fusion_period_us / self.inertial_period_us > RAW_SAMPLE_CAPACITY as u64 {
            return Err(SamplerError::InvalidConfig {
                reason: "inertial samples per fusion cycle exceed buffer capacity",
            });
        }
        if self.fusion_period_us / self.magnetometer_period_us > RAW_SAMPLE_CAPACITY as u64 {
            return Err(SamplerError::InvalidConfig {
                reason: "magnetometer samples per fusion cycle exceed buffer capacity",
            });
        }
        if self.report_period_us / self.fusion_period_us > FUSED_SAMPLE_CAPACITY as u64 {
            return Err(SamplerError::InvalidConfig {
                reason: "fusion updates per report exceed buffer capacity",
            });
        }
        if !self.sigma_multiplier.is_finite() || self.sigma_multiplier <= 0.0 {
            return Err(SamplerError::InvalidConfig {
                reason: "sigma multiplier must be finite and positive",
            });
        }
        Ok(())
    }
}
