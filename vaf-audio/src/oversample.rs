//! Oversampled integration: several RK4 sub-steps per audio sample
//!
//! Running the integrator at N times the audio rate keeps the saturating
//! feedback terms inside RK4's stability region at high cutoff or resonance.

use crate::models::{DerivativeModel, StepParams};
use crate::solver::rk4_step;

/// Smallest accepted oversample factor
pub const MIN_OVERSAMPLE: usize = 1;
/// Largest accepted oversample factor
pub const MAX_OVERSAMPLE: usize = 8;
/// Factor used by newly constructed filters
pub const DEFAULT_OVERSAMPLE: usize = 2;

/// Oversample factor, always within [1, 8]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oversample(usize);

impl Oversample {
    /// Clamp a requested factor into range. Out-of-range requests are not an error.
    pub fn new(requested: i32) -> Self {
        let factor = requested.clamp(MIN_OVERSAMPLE as i32, MAX_OVERSAMPLE as i32);
        Self(factor as usize)
    }

    /// Effective factor
    pub fn factor(self) -> usize {
        self.0
    }

    /// Integrator step for one sub-step: `1 / (factor * sample_rate)`
    #[inline]
    pub fn step_size(self, sample_rate: f64) -> f64 {
        1.0 / (self.0 as f64 * sample_rate)
    }

    /// Integrate `state` across one audio sample using `factor` RK4 sub-steps of size `h`
    #[inline]
    pub fn advance<const N: usize, M: DerivativeModel<N>>(
        self,
        state: &mut [f64; N],
        h: f64,
        params: &StepParams,
    ) {
        for _ in 0..self.0 {
            *state = rk4_step(state, h, |s| M::derivatives(s, params));
        }
    }
}

impl Default for Oversample {
    fn default() -> Self {
        Self(DEFAULT_OVERSAMPLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ms20LowPass;

    #[test]
    fn test_oversample_clamping() {
        assert_eq!(Oversample::new(0).factor(), 1);
        assert_eq!(Oversample::new(-5).factor(), 1);
        assert_eq!(Oversample::new(1).factor(), 1);
        assert_eq!(Oversample::new(4).factor(), 4);
        assert_eq!(Oversample::new(8).factor(), 8);
        assert_eq!(Oversample::new(9).factor(), 8);
        assert_eq!(Oversample::new(i32::MAX).factor(), 8);
        assert_eq!(Oversample::default().factor(), 2);
    }

    #[test]
    fn test_step_size() {
        let h = Oversample::new(4).step_size(48000.0);
        assert!((h - 1.0 / 192000.0).abs() < 1e-15);
    }

    #[test]
    fn test_substeps_reach_same_instant() {
        // Different factors should land on (nearly) the same solution for a smooth response
        let params = StepParams::new(1.0, 200.0, 0.0);
        let sample_rate = 44100.0;

        let mut coarse = [0.0; 2];
        let mut fine = [0.0; 2];
        let one = Oversample::new(1);
        let eight = Oversample::new(8);
        for _ in 0..100 {
            one.advance::<2, Ms20LowPass>(&mut coarse, one.step_size(sample_rate), &params);
            eight.advance::<2, Ms20LowPass>(&mut fine, eight.step_size(sample_rate), &params);
        }
        assert!((coarse[1] - fine[1]).abs() < 1e-6);
        assert!(fine[1] > 0.0);
    }
}
