//! Accumulation buffer capacities
//!
//! Capacities are compile-time constants so every buffer lives inline in the
//! sampler with no heap allocation. Configuration validation rejects cadence
//! ratios whose nominal fill would exceed these capacities; the margin above
//! the default ratios absorbs catch-up bursts after transient overload.

/// Capacity of each raw sample buffer (per axis).
///
/// Default cadences fill 50 slots per fusion cycle (50 ms cycle at 1 kHz);
/// the remainder is catch-up headroom.
pub const RAW_SAMPLE_CAPACITY: usize = 128;

/// Capacity of each fused output buffer.
///
/// Default cadences append 20 entries per report (1 s report at 20 Hz).
pub const FUSED_SAMPLE_CAPACITY: usize = 32;
