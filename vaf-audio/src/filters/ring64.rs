//! 64-band ZDF resonator bank
//!
//! Every band is an independent TPT state-variable filter fed by the same
//! input. Band `k` rings at `cutoff * freq_mult[k]`; its band-pass output is
//! weighted by a per-band gain tilted by `brightness`, summed, normalised by
//! the active band count and scaled by the overall gain.
//!
//! Bands whose frequency exceeds 0.48 fs are muted and held at zero state.

use super::{is_valid_rate, ControlInputs, FilterCore};
use crate::control::{apply_sequence, ControlError, ControlValue};
use crate::defaults::FilterDefaults;
use crate::smoothing::{
    bank_resonance, clamp_brightness, clamp_cutoff, clamp_finite, LinearRamp, NYQUIST_GUARD,
};
use crate::softclip::soft_clip;
use crate::status::FilterStatus;
use crate::tpt::{prewarp_gain, TptState};

/// Band storage capacity
pub const MAX_BANDS: usize = 64;
/// Active bands of a new bank
pub const DEFAULT_BANDS: usize = 16;
/// Per-band gain ceiling
pub const MAX_BAND_GAIN: f64 = 16.0;
/// Overall gain ceiling
pub const MAX_OUTPUT_GAIN: f64 = 2.0;
/// Overall gain of a new bank
pub const DEFAULT_OUTPUT_GAIN: f64 = 0.9;

/// Band index (1-based) around which brightness tilts the gains
const BRIGHTNESS_PIVOT: f64 = 4.0;

/// Resonator bank instance
pub struct ResonatorBank {
    bands: [TptState; MAX_BANDS],
    freq_mult: [f64; MAX_BANDS],
    gain_targets: [f64; MAX_BANDS],
    band_gain: [LinearRamp; MAX_BANDS],
    active_bands: usize,

    cutoff: LinearRamp,
    resonance: LinearRamp,
    brightness: LinearRamp,

    gain: f64,
    softclip: bool,
    // Set once the first block has placed the ramps on real targets
    primed: bool,
}

impl ResonatorBank {
    /// Create a bank with 16 active bands, unit multipliers and gains, overall gain 0.9
    pub fn new() -> Self {
        Self::with_defaults(&FilterDefaults::default())
    }

    pub fn with_defaults(defaults: &FilterDefaults) -> Self {
        let mut bank = Self {
            bands: [TptState::default(); MAX_BANDS],
            freq_mult: [1.0; MAX_BANDS],
            gain_targets: [1.0; MAX_BANDS],
            band_gain: [LinearRamp::new(1.0); MAX_BANDS],
            active_bands: DEFAULT_BANDS,
            cutoff: LinearRamp::new(0.0),
            resonance: LinearRamp::new(1.0),
            brightness: LinearRamp::new(0.0),
            gain: DEFAULT_OUTPUT_GAIN,
            softclip: defaults.softclip,
            primed: false,
        };
        bank.set_bands(defaults.bands);
        bank.set_gain(defaults.gain);
        bank
    }

    /// Set the active band count (clamped to 1-64), returning the effective count
    pub fn set_bands(&mut self, requested: i32) -> usize {
        self.active_bands = requested.clamp(1, MAX_BANDS as i32) as usize;
        self.active_bands
    }

    pub fn bands(&self) -> usize {
        self.active_bands
    }

    /// Set the overall gain (clamped to 0-2), returning the effective gain
    pub fn set_gain(&mut self, gain: f64) -> f64 {
        self.gain = clamp_finite(gain, 0.0, MAX_OUTPUT_GAIN);
        self.gain
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Enable/disable soft clipping of the mixed output
    pub fn set_softclip(&mut self, enabled: bool) {
        self.softclip = enabled;
    }

    pub fn softclip(&self) -> bool {
        self.softclip
    }

    /// Set frequency multipliers from band 0 upwards.
    ///
    /// Bands not covered keep their multiplier. Negative multipliers are
    /// clamped to 0. Unusable entries are skipped and returned.
    pub fn set_freqs(&mut self, values: &[ControlValue]) -> Vec<ControlError> {
        apply_sequence(values, MAX_BANDS, |k, mult| {
            self.freq_mult[k] = mult.max(0.0);
        })
    }

    /// Set per-band gains (each clamped to 0-16) from band 0 upwards.
    ///
    /// The new gains become ramp targets for the next block.
    pub fn set_gains(&mut self, values: &[ControlValue]) -> Vec<ControlError> {
        apply_sequence(values, MAX_BANDS, |k, gain| {
            self.gain_targets[k] = gain.clamp(0.0, MAX_BAND_GAIN);
        })
    }

    /// Frequency multiplier of band `k`
    pub fn freq_mult(&self, k: usize) -> Option<f64> {
        self.freq_mult.get(k).copied()
    }

    /// Requested (target) gain of band `k`
    pub fn band_gain(&self, k: usize) -> Option<f64> {
        self.gain_targets.get(k).copied()
    }

    /// Integrator states of band `k`
    pub fn band_state(&self, k: usize) -> Option<TptState> {
        self.bands.get(k).copied()
    }

    /// Running base cutoff (Hz)
    pub fn cutoff(&self) -> f64 {
        self.cutoff.value()
    }

    /// Running damping after remapping
    pub fn resonance(&self) -> f64 {
        self.resonance.value()
    }

    /// Running brightness
    pub fn brightness(&self) -> f64 {
        self.brightness.value()
    }

    /// Brightness-tilted gain of band `k` (0-based), never negative
    #[inline]
    fn tilted_gain(base: f64, brightness: f64, k: usize) -> f64 {
        let tilt = brightness * (((k + 1) as f64 - BRIGHTNESS_PIVOT) / BRIGHTNESS_PIVOT) + 1.0;
        (base * tilt).max(0.0)
    }

    /// Process one block into the mixed output
    pub fn process(
        &mut self,
        sample_rate: f64,
        block: ControlInputs<'_>,
        brightness: &[f32],
        out: &mut [f32],
    ) {
        let n = block.len().min(brightness.len()).min(out.len());
        let Some((cutoff, resonance)) = block.targets() else {
            return;
        };
        if n == 0 {
            return;
        }
        if !is_valid_rate(sample_rate) {
            out[..n].fill(0.0);
            return;
        }

        let cutoff = clamp_cutoff(cutoff, sample_rate);
        let resonance = bank_resonance(resonance, sample_rate);
        let brightness = clamp_brightness(f64::from(brightness[0]));

        if self.primed {
            self.cutoff.set_target(cutoff, n);
            self.resonance.set_target(resonance, n);
            self.brightness.set_target(brightness, n);
            for (ramp, &target) in self.band_gain.iter_mut().zip(&self.gain_targets) {
                ramp.set_target(target, n);
            }
        } else {
            // First block: no previous value to ramp from
            self.cutoff.snap(cutoff);
            self.resonance.snap(resonance);
            self.brightness.snap(brightness);
            for (ramp, &target) in self.band_gain.iter_mut().zip(&self.gain_targets) {
                ramp.snap(target);
            }
            self.primed = true;
        }

        let band_limit = NYQUIST_GUARD * sample_rate;
        let scale = self.gain / self.active_bands as f64;

        for (&input, sample) in block.input[..n].iter().zip(out[..n].iter_mut()) {
            let input = f64::from(input);
            let base_cutoff = self.cutoff.value();
            let resonance = self.resonance.value();
            let brightness = self.brightness.value();

            let mut sum = 0.0;
            let bands = self
                .bands
                .iter_mut()
                .zip(&self.freq_mult)
                .zip(&self.band_gain)
                .enumerate();

            for (k, ((state, &mult), gain)) in bands {
                let band_cutoff = base_cutoff * mult;
                if band_cutoff > band_limit {
                    state.clear();
                    continue;
                }
                if k >= self.active_bands {
                    continue;
                }

                let weight = Self::tilted_gain(gain.value(), brightness, k);
                let g = prewarp_gain(band_cutoff, sample_rate);
                sum += state.tick(input, g, resonance).bp * weight;
            }

            let mut mixed = sum * scale;
            if self.softclip {
                mixed = soft_clip(mixed);
            }
            *sample = mixed as f32;

            self.cutoff.advance();
            self.resonance.advance();
            self.brightness.advance();
            for ramp in self.band_gain.iter_mut() {
                ramp.advance();
            }
        }
    }
}

impl Default for ResonatorBank {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCore for ResonatorBank {
    fn reset(&mut self) {
        for band in self.bands.iter_mut() {
            band.clear();
        }
    }

    fn name(&self) -> &'static str {
        "ring64"
    }

    fn status(&self) -> FilterStatus {
        FilterStatus::Bank {
            bands: self.active_bands,
            softclip: self.softclip,
            gain: self.gain,
        }
    }
}
