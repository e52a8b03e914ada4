//! Filter instances driven one block at a time

mod ms20;
mod ota;
mod ring64;
mod svf;

pub use ms20::{Ms20Filter, Ms20Mode};
pub use ota::OtaLadderFilter;
pub use ring64::{ResonatorBank, DEFAULT_BANDS, DEFAULT_OUTPUT_GAIN, MAX_BANDS, MAX_BAND_GAIN, MAX_OUTPUT_GAIN};
pub use svf::{SvfOutput, SvfOutputs, ZdfSvf};

use crate::models::{DerivativeModel, StepParams};
use crate::oversample::Oversample;
use crate::status::FilterStatus;

/// Operations shared by every filter instance
pub trait FilterCore: Send {
    /// Zero all filter state immediately
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &'static str;

    /// Snapshot for introspection
    fn status(&self) -> FilterStatus;

    /// Report the current status through the log
    fn print(&self) {
        self.status().log(self.name());
    }
}

/// Per-sample signal buffers of one block.
///
/// The block length is the shortest of the buffers; the host is expected to
/// hand in equal lengths.
#[derive(Debug, Clone, Copy)]
pub struct ControlInputs<'a> {
    pub input: &'a [f32],
    /// Hz
    pub cutoff: &'a [f32],
    /// Raw control units
    pub resonance: &'a [f32],
}

impl<'a> ControlInputs<'a> {
    pub fn new(input: &'a [f32], cutoff: &'a [f32], resonance: &'a [f32]) -> Self {
        Self {
            input,
            cutoff,
            resonance,
        }
    }

    /// Samples in the block
    pub fn len(&self) -> usize {
        self.input.len().min(self.cutoff.len()).min(self.resonance.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(input, cutoff, resonance)` per sample
    fn frames(&self) -> impl Iterator<Item = (f64, f64, f64)> + 'a {
        self.input
            .iter()
            .zip(self.cutoff)
            .zip(self.resonance)
            .map(|((&x, &fc), &q)| (f64::from(x), f64::from(fc), f64::from(q)))
    }

    /// Block-rate targets for the ZDF filters: the first cutoff and resonance sample
    fn targets(&self) -> Option<(f64, f64)> {
        match (self.cutoff.first(), self.resonance.first()) {
            (Some(&fc), Some(&q)) if !self.is_empty() => Some((f64::from(fc), f64::from(q))),
            _ => None,
        }
    }
}

#[inline]
fn is_valid_rate(sample_rate: f64) -> bool {
    sample_rate.is_finite() && sample_rate > 0.0
}

/// Integrate one block through model `M`, writing one output per sample
fn run_rk4<const N: usize, M: DerivativeModel<N>>(
    state: &mut [f64; N],
    oversample: Oversample,
    sample_rate: f64,
    block: &ControlInputs<'_>,
    out: &mut [f32],
) {
    if !is_valid_rate(sample_rate) {
        let n = block.len().min(out.len());
        out[..n].fill(0.0);
        return;
    }

    let h = oversample.step_size(sample_rate);
    for (sample, (input, cutoff, resonance)) in out.iter_mut().zip(block.frames()) {
        let params = StepParams::new(input, cutoff, resonance);
        oversample.advance::<N, M>(state, h, &params);
        *sample = M::output(state, &params) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_length_is_shortest_buffer() {
        let input = [0.0f32; 8];
        let cutoff = [100.0f32; 6];
        let resonance = [0.0f32; 7];
        let block = ControlInputs::new(&input, &cutoff, &resonance);
        assert_eq!(block.len(), 6);
        assert_eq!(block.frames().count(), 6);
        assert_eq!(block.targets(), Some((100.0, 0.0)));
    }

    #[test]
    fn test_empty_block_has_no_targets() {
        let block = ControlInputs::new(&[], &[1.0], &[1.0]);
        assert!(block.is_empty());
        assert_eq!(block.targets(), None);
    }
}
