//! 4-pole OTA ladder filter
//!
//! Four cascaded saturating one-pole stages with global feedback from the
//! last stage through `tanh(1.96 s3)`. High resonance self-oscillates; that
//! is the modelled circuit, not an error.

use super::{run_rk4, ControlInputs, FilterCore};
use crate::defaults::FilterDefaults;
use crate::models::OtaLadder;
use crate::oversample::Oversample;
use crate::status::FilterStatus;

/// OTA ladder filter instance
pub struct OtaLadderFilter {
    state: [f64; 4],
    oversample: Oversample,
}

impl OtaLadderFilter {
    /// Create a ladder with zeroed state and 2x oversampling
    pub fn new() -> Self {
        Self::with_defaults(&FilterDefaults::default())
    }

    pub fn with_defaults(defaults: &FilterDefaults) -> Self {
        Self {
            state: [0.0; 4],
            oversample: Oversample::new(defaults.oversample),
        }
    }

    /// Set the oversample factor (clamped to 1-8), returning the effective factor
    pub fn set_oversample(&mut self, requested: i32) -> usize {
        self.oversample = Oversample::new(requested);
        self.oversample.factor()
    }

    pub fn oversample(&self) -> usize {
        self.oversample.factor()
    }

    pub fn state(&self) -> &[f64; 4] {
        &self.state
    }

    /// Process one block; the output is the fourth stage
    pub fn process(&mut self, sample_rate: f64, block: ControlInputs<'_>, out: &mut [f32]) {
        run_rk4::<4, OtaLadder>(&mut self.state, self.oversample, sample_rate, &block, out);
    }
}

impl Default for OtaLadderFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCore for OtaLadderFilter {
    fn reset(&mut self) {
        self.state = [0.0; 4];
    }

    fn name(&self) -> &'static str {
        "ota"
    }

    fn status(&self) -> FilterStatus {
        FilterStatus::Rk4 {
            mode: None,
            state: self.state.to_vec(),
            oversample: self.oversample.factor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &mut OtaLadderFilter, input: &[f32], cutoff: f32, resonance: f32) -> Vec<f32> {
        let cutoff = vec![cutoff; input.len()];
        let resonance = vec![resonance; input.len()];
        let mut out = vec![0.0; input.len()];
        filter.process(48000.0, ControlInputs::new(input, &cutoff, &resonance), &mut out);
        out
    }

    #[test]
    fn test_ota_creation() {
        let filter = OtaLadderFilter::new();
        assert_eq!(filter.oversample(), 2);
        assert_eq!(filter.state(), &[0.0; 4]);
        assert_eq!(filter.name(), "ota");
    }

    #[test]
    fn test_ota_silence_stays_silent() {
        let mut filter = OtaLadderFilter::new();
        for &resonance in &[0.0, 1.0, 4.0, 20.0] {
            let out = run(&mut filter, &[0.0; 256], 5000.0, resonance);
            assert!(out.iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn test_ota_output_is_last_stage() {
        let mut filter = OtaLadderFilter::new();
        let out = run(&mut filter, &[0.5; 64], 1000.0, 0.0);
        assert_eq!(out[63], filter.state()[3] as f32);
    }

    #[test]
    fn test_ota_clear() {
        let mut filter = OtaLadderFilter::new();
        run(&mut filter, &[0.5; 256], 1000.0, 2.0);
        assert!(filter.state().iter().all(|&s| s != 0.0));
        filter.reset();
        assert_eq!(filter.state(), &[0.0; 4]);
    }

    #[test]
    fn test_ota_oversample_clamping() {
        let mut filter = OtaLadderFilter::new();
        assert_eq!(filter.set_oversample(-1), 1);
        assert_eq!(filter.set_oversample(100), 8);
    }

    #[test]
    fn test_ota_four_poles_steeper_than_first_stage() {
        // A high-frequency tone should be attenuated more at stage 4 than stage 1
        let input: Vec<f32> = (0..4800)
            .map(|i| (2.0 * std::f32::consts::PI * 8000.0 * i as f32 / 48000.0).sin() * 0.1)
            .collect();
        let mut filter = OtaLadderFilter::new();
        let out = run(&mut filter, &input, 500.0, 0.0);
        let peak = out[2400..].iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(peak < 1e-4, "peak = {}", peak);
    }
}
