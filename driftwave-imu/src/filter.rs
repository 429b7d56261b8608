//! Outlier-Robust Mean Reduction
//!
//! ## Overview
//!
//! Reduces a burst of raw sensor samples to a single scalar while suppressing
//! statistical outliers. Sensor streams on a moving buoy carry occasional
//! single-sample spikes (bus glitches, vibration resonance, wave slap); a
//! plain mean lets one spike bias a whole burst, while this n-sigma rule
//! discards it.
//!
//! ## Algorithm
//!
//! Two passes over the burst:
//!
//! ```text
//! mean  = Σx / N
//! sigma = sqrt(Σ(x - mean)² / N)        (population deviation)
//! keep  = { x : |x - mean| <= k·sigma }
//! out   = Σkeep / |keep|
//! ```
//!
//! The two-pass form makes the reduction deterministic and independent of
//! sample order, which a running-statistics variant would not be.
//!
//! ## Edge Cases
//!
//! - One sample, or all samples equal: the common value is returned
//!   exactly, no statistics computed.
//! - Zero samples: [`FilterError::EmptyInput`]. The cadence configuration is
//!   validated so every buffer receives at least one sample per cycle; an
//!   empty buffer at reduction time means the scheduler or a sensor silently
//!   failed, and must surface as an error rather than a fabricated value.
//! - Everything rejected: only possible with a multiplier below one sigma
//!   (at least one sample always lies within one deviation of the mean). The
//!   unfiltered mean is returned so the reduction never divides by zero.

use thiserror_no_std::Error;

/// Errors from the mean reduction
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// Reduction invoked on an empty sample buffer
    #[error("mean reduction invoked on an empty sample buffer")]
    EmptyInput,
}

/// n-sigma outlier-rejecting mean filter
///
/// Stateless apart from the configured multiplier; one instance serves every
/// buffer in the sampling core.
#[derive(Debug, Clone, Copy)]
pub struct SigmaMeanFilter {
    multiplier: f32,
}

impl SigmaMeanFilter {
    /// Create a filter rejecting samples beyond `multiplier` standard
    /// deviations from the burst mean
    pub const fn new(multiplier: f32) -> Self {
        Self { multiplier }
    }

    /// Configured sigma multiplier
    pub const fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Reduce a burst of samples to its outlier-robust mean
    pub fn reduce(&self, samples: &[f32]) -> Result<f32, FilterError> {
        let (&first, rest) = samples.split_first().ok_or(FilterError::EmptyInput)?;
        // Single sample and zero-variance bursts short-circuit so the
        // result is exact, not subject to accumulation rounding.
        if rest.iter().all(|&s| s == first) {
            return Ok(first);
        }

        let n = samples.len() as f32;
        let mean = samples.iter().sum::<f32>() / n;
        let variance = samples
            .iter()
            .map(|&s| {
                let d = s - mean;
                d * d
            })
            .sum::<f32>()
            / n;
        let threshold = self.multiplier * libm::sqrtf(variance);

        let mut kept_sum = 0.0f32;
        let mut kept = 0u32;
        for &s in samples {
            if libm::fabsf(s - mean) <= threshold {
                kept_sum += s;
                kept += 1;
            }
        }

        if kept == 0 {
            return Ok(mean);
        }
        Ok(kept_sum / kept as f32)
    }
}

impl Default for SigmaMeanFilter {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SIGMA_MULTIPLIER)
    }
}
