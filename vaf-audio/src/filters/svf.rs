//! Zero-delay-feedback state-variable filter
//!
//! One TPT core producing low-pass, band-pass and high-pass at once. Cutoff
//! and resonance are block-rate controls: the first sample of each control
//! buffer is the block target, and the running value ramps to it linearly.
//! The first block after construction starts on its targets.

use super::{is_valid_rate, ControlInputs, FilterCore};
use crate::smoothing::{clamp_cutoff, svf_resonance, LinearRamp};
use crate::status::FilterStatus;
use crate::tpt::{prewarp_gain, SvfFrame, TptState};

/// Output buffers for the three simultaneous responses
pub struct SvfOutputs<'a> {
    pub lp: &'a mut [f32],
    pub bp: &'a mut [f32],
    pub hp: &'a mut [f32],
}

impl SvfOutputs<'_> {
    fn len(&self) -> usize {
        self.lp.len().min(self.bp.len()).min(self.hp.len())
    }
}

/// A single response of the state-variable filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SvfOutput {
    #[default]
    LowPass,
    BandPass,
    HighPass,
}

impl SvfOutput {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lp" | "lowpass" => Some(SvfOutput::LowPass),
            "bp" | "bandpass" => Some(SvfOutput::BandPass),
            "hp" | "highpass" => Some(SvfOutput::HighPass),
            _ => None,
        }
    }

    #[inline]
    fn pick(self, frame: &SvfFrame) -> f64 {
        match self {
            SvfOutput::LowPass => frame.lp,
            SvfOutput::BandPass => frame.bp,
            SvfOutput::HighPass => frame.hp,
        }
    }
}

/// ZDF state-variable filter instance
pub struct ZdfSvf {
    state: TptState,
    cutoff: LinearRamp,
    resonance: LinearRamp,
    // Set once the first block has placed the ramps on real targets
    primed: bool,
}

impl ZdfSvf {
    /// Create a filter at rest: zero state, cutoff 0 Hz, damping 1
    pub fn new() -> Self {
        Self {
            state: TptState::default(),
            cutoff: LinearRamp::new(0.0),
            resonance: LinearRamp::new(1.0),
            primed: false,
        }
    }

    pub fn state(&self) -> TptState {
        self.state
    }

    /// Running cutoff (Hz)
    pub fn cutoff(&self) -> f64 {
        self.cutoff.value()
    }

    /// Running damping after remapping
    pub fn resonance(&self) -> f64 {
        self.resonance.value()
    }

    /// Process one block into the three outputs
    pub fn process(&mut self, sample_rate: f64, block: ControlInputs<'_>, mut out: SvfOutputs<'_>) {
        let n = block.len().min(out.len());
        if block.is_empty() {
            return;
        }
        if !is_valid_rate(sample_rate) {
            out.lp[..n].fill(0.0);
            out.bp[..n].fill(0.0);
            out.hp[..n].fill(0.0);
            return;
        }

        self.render(sample_rate, &block, n, |i, frame| {
            out.lp[i] = frame.lp as f32;
            out.bp[i] = frame.bp as f32;
            out.hp[i] = frame.hp as f32;
        });
    }

    /// Process one block, writing only the selected response
    pub fn process_output(
        &mut self,
        sample_rate: f64,
        block: ControlInputs<'_>,
        output: SvfOutput,
        out: &mut [f32],
    ) {
        let n = block.len().min(out.len());
        if block.is_empty() {
            return;
        }
        if !is_valid_rate(sample_rate) {
            out[..n].fill(0.0);
            return;
        }

        self.render(sample_rate, &block, n, |i, frame| {
            out[i] = output.pick(&frame) as f32;
        });
    }

    fn render(
        &mut self,
        sample_rate: f64,
        block: &ControlInputs<'_>,
        n: usize,
        mut emit: impl FnMut(usize, SvfFrame),
    ) {
        let Some((cutoff, resonance)) = block.targets() else {
            return;
        };
        let cutoff = clamp_cutoff(cutoff, sample_rate);
        let resonance = svf_resonance(resonance);

        if self.primed {
            self.cutoff.set_target(cutoff, n);
            self.resonance.set_target(resonance, n);
        } else {
            self.cutoff.snap(cutoff);
            self.resonance.snap(resonance);
            self.primed = true;
        }

        for (i, &input) in block.input[..n].iter().enumerate() {
            let g = prewarp_gain(self.cutoff.value(), sample_rate);
            emit(i, self.state.tick(f64::from(input), g, self.resonance.value()));

            self.cutoff.advance();
            self.resonance.advance();
        }
    }
}

impl Default for ZdfSvf {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCore for ZdfSvf {
    fn reset(&mut self) {
        self.state.clear();
    }

    fn name(&self) -> &'static str {
        "svf"
    }

    fn status(&self) -> FilterStatus {
        FilterStatus::Svf {
            cutoff: self.cutoff.value(),
            resonance: self.resonance.value(),
            s1: self.state.s1,
            s2: self.state.s2,
        }
    }
}
