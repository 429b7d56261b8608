//! Error Types for the Sampling Core
//!
//! The error system follows the constraints of the target hardware:
//!
//! 1. **Small Size**: every variant carries only inline `&'static str` and
//!    scalar data, so errors stay cheap to return from the polling hot path.
//!
//! 2. **No Heap Allocation**: no `String`, no boxed sources. Deterministic
//!    memory usage on a device with tens of kilobytes of RAM.
//!
//! 3. **Copy Semantics**: errors implement `Copy` so they can be stashed in
//!    diagnostics without move complications.
//!
//! ## Error Categories
//!
//! - `SensorRead`: a hardware driver reported failure. Fatal to the report
//!   in progress; the caller retries on its next scheduling tick. No output
//!   values are produced and the report cursor is not advanced.
//! - `EmptyBuffer`: a reduction ran over a buffer that received no samples.
//!   Distinct from `SensorRead` on purpose: a buffer that stays empty means
//!   either a scheduling defect or a silently dead sensor upstream, and must
//!   never be papered over with a zero.
//! - `InvalidConfig`: the cadence configuration was rejected before any
//!   sampling started.

use thiserror_no_std::Error;

/// Result type for sampling operations
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Sampling errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerError {
    /// A sensor driver returned failure
    #[error("sensor read failed on {channel}: {reason}")]
    SensorRead {
        /// Which driver failed ("inertial" or "magnetometer")
        channel: &'static str,
        /// Driver-supplied failure reason
        reason: &'static str,
    },

    /// A mean reduction ran over zero samples
    #[error("no samples accumulated for {channel}")]
    EmptyBuffer {
        /// Which accumulation buffer was empty
        channel: &'static str,
    },

    /// Configuration rejected before sampling started
    #[error("invalid sampler configuration: {reason}")]
    InvalidConfig {
        /// Which constraint was violated
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SamplerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::SensorRead { channel, reason } =>
                defmt::write!(fmt, "sensor read failed on {}: {}", channel, reason),
            Self::EmptyBuffer { channel } =>
                defmt::write!(fmt, "no samples accumulated for {}", channel),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "invalid configuration: {}", reason),
        }
    }
}
