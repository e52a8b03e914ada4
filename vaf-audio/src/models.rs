//! Nonlinear derivative models for the RK4 filters
//!
//! Each model is a zero-sized type whose associated functions map a state
//! vector and the current control values to a rate of change. Both use
//! `k = 2 pi cutoff` as the integrator gain and `tanh` saturation in the
//! resonance path.

use std::f64::consts::TAU;

/// Control values seen by a derivative model for one audio sample
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepParams {
    pub input: f64,
    /// Hz, unclamped
    pub cutoff: f64,
    /// Never negative
    pub resonance: f64,
}

impl StepParams {
    /// Build the per-sample parameters. Negative resonance is forced to 0.
    #[inline]
    pub fn new(input: f64, cutoff: f64, resonance: f64) -> Self {
        Self {
            input,
            cutoff,
            resonance: resonance.max(0.0),
        }
    }

    #[inline]
    fn gain(&self) -> f64 {
        TAU * self.cutoff
    }
}

/// A pure state -> rate-of-change mapping with an output tap
pub trait DerivativeModel<const N: usize> {
    fn derivatives(state: &[f64; N], params: &StepParams) -> [f64; N];

    /// Output sample taken from the state after the audio sample is integrated
    fn output(state: &[f64; N], params: &StepParams) -> f64;
}

/// MS20-style 2-pole low-pass
pub struct Ms20LowPass;

/// MS20-style 2-pole band-pass
pub struct Ms20BandPass;

/// MS20-style 2-pole high-pass
pub struct Ms20HighPass;

/// 4-pole OTA ladder with global tanh feedback
pub struct OtaLadder;

impl DerivativeModel<2> for Ms20LowPass {
    #[inline]
    fn derivatives(s: &[f64; 2], p: &StepParams) -> [f64; 2] {
        let k = p.gain();
        let feedback = (p.resonance * s[1]).tanh();
        [
            k * (p.input - s[0] - feedback),
            k * (s[0] - s[1] + feedback),
        ]
    }

    #[inline]
    fn output(s: &[f64; 2], _: &StepParams) -> f64 {
        s[1]
    }
}

impl DerivativeModel<2> for Ms20BandPass {
    #[inline]
    fn derivatives(s: &[f64; 2], p: &StepParams) -> [f64; 2] {
        let k = p.gain();
        let feedback = (p.resonance * s[1]).tanh();
        [
            k * (-p.input - s[0] - feedback),
            k * (p.input + s[0] - s[1] + feedback),
        ]
    }

    #[inline]
    fn output(s: &[f64; 2], _: &StepParams) -> f64 {
        s[1]
    }
}

impl DerivativeModel<2> for Ms20HighPass {
    #[inline]
    fn derivatives(s: &[f64; 2], p: &StepParams) -> [f64; 2] {
        let k = p.gain();
        let feedback = (p.resonance * s[1]).tanh();
        [k * (s[0] - feedback), k * (-p.input - s[1])]
    }

    /// The state tracks `-input` low-passed; adding the input back restores
    /// the direct term.
    #[inline]
    fn output(s: &[f64; 2], p: &StepParams) -> f64 {
        s[1] + p.input
    }
}

impl DerivativeModel<4> for OtaLadder {
    #[inline]
    fn derivatives(s: &[f64; 4], p: &StepParams) -> [f64; 4] {
        let k = p.gain();
        [
            k * (1.1 * p.input - p.resonance * (1.96 * s[3]).tanh() - s[0]).tanh(),
            k * (1.1 * s[0] - s[1]).tanh(),
            k * (1.1 * s[1] - s[2]).tanh(),
            k * (1.1 * s[2] - s[3]).tanh(),
        ]
    }

    #[inline]
    fn output(s: &[f64; 4], _: &StepParams) -> f64 {
        s[3]
    }
}
