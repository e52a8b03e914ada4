//! Per-block parameter ramps and control remapping for the ZDF filters
//!
//! Control values arrive once per block. Each tracked value ramps linearly
//! from where the previous block left it to the new target, so parameter
//! changes never step mid-signal.

/// Lowest cutoff the ZDF filters accept (Hz)
pub const MIN_CUTOFF_HZ: f64 = 0.0003;
/// Highest usable cutoff as a fraction of the sample rate
pub const NYQUIST_GUARD: f64 = 0.48;

/// Resonance bounds of the single state-variable filter
pub const SVF_RESONANCE_MIN: f64 = 0.0005;
/// Resonance bounds of the resonator bank
pub const BANK_RESONANCE_MIN: f64 = 0.00002;
/// Shared upper resonance bound
pub const RESONANCE_MAX: f64 = 1.0;

/// Linear per-sample ramp from a running value to a block target.
///
/// For start value `a`, target `b` and block length `n`, sample `i` sees
/// `a + i (b - a) / n`, and the value is exactly `b` once `n` samples have
/// been advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRamp {
    start: f64,
    target: f64,
    step: f64,
    len: usize,
    index: usize,
}

impl LinearRamp {
    /// A ramp at rest on `value`
    pub const fn new(value: f64) -> Self {
        Self {
            start: value,
            target: value,
            step: 0.0,
            len: 0,
            index: 0,
        }
    }

    /// Begin a new block: ramp from the current value to `target` over `block_len` samples
    pub fn set_target(&mut self, target: f64, block_len: usize) {
        let start = if block_len == 0 { target } else { self.value() };
        self.start = start;
        self.target = target;
        self.len = block_len;
        self.index = 0;
        self.step = if block_len == 0 {
            0.0
        } else {
            (target - start) / block_len as f64
        };
    }

    /// Value for the current sample
    #[inline]
    pub fn value(&self) -> f64 {
        if self.index >= self.len {
            self.target
        } else {
            self.start + self.step * self.index as f64
        }
    }

    /// Move to the next sample
    #[inline]
    pub fn advance(&mut self) {
        if self.index < self.len {
            self.index += 1;
        }
    }

    /// Per-sample increment of the current block
    pub fn increment(&self) -> f64 {
        self.step
    }

    /// Jump straight to `value` without ramping
    pub fn snap(&mut self, value: f64) {
        *self = Self::new(value);
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Clamp into `[lo, hi]`, sending NaN to `lo`. Never panics, even if `lo > hi`.
#[inline]
pub fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.max(lo).min(hi)
    }
}

/// Cutoff clamp for the ZDF filters: `[MIN_CUTOFF_HZ, 0.48 fs]`
#[inline]
pub fn clamp_cutoff(cutoff: f64, sample_rate: f64) -> f64 {
    clamp_finite(cutoff, MIN_CUTOFF_HZ, sample_rate * NYQUIST_GUARD)
}

/// Raw control -> damping for the single state-variable filter: `1 - 0.01 raw`.
///
/// Raw 0 is the widest setting; raw 100 approaches self-oscillation.
#[inline]
pub fn svf_resonance(raw: f64) -> f64 {
    clamp_finite(1.0 - 0.01 * raw, SVF_RESONANCE_MIN, RESONANCE_MAX)
}

/// Raw control -> damping for the resonator bank.
///
/// The raw value acts as a decay time: `1 - exp((-1000 / fs) / (6.91 raw))`.
/// Longer decay means less damping and a narrower ring.
#[inline]
pub fn bank_resonance(raw: f64, sample_rate: f64) -> f64 {
    let damping = 1.0 - ((-1000.0 / sample_rate) / (6.91 * raw)).exp();
    clamp_finite(damping, BANK_RESONANCE_MIN, RESONANCE_MAX)
}

/// Brightness (spectral tilt) clamp: `[-1, 1]`
#[inline]
pub fn clamp_brightness(brightness: f64) -> f64 {
    clamp_finite(brightness, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_sequence() {
        let mut ramp = LinearRamp::new(2.0);
        ramp.set_target(6.0, 4);
        assert_eq!(ramp.increment(), 1.0);

        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(ramp.value());
            ramp.advance();
        }
        assert_eq!(seen, vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(ramp.value(), 6.0);
    }

    #[test]
    fn test_ramp_reaches_target_exactly() {
        let mut ramp = LinearRamp::new(0.1);
        ramp.set_target(0.7, 64);
        for i in 0..64 {
            let expected = 0.1 + i as f64 * (0.7 - 0.1) / 64.0;
            assert!((ramp.value() - expected).abs() < 1e-12);
            ramp.advance();
        }
        assert_eq!(ramp.value(), 0.7);

        // Extra advances hold the target
        ramp.advance();
        assert_eq!(ramp.value(), 0.7);
    }

    #[test]
    fn test_ramp_continues_from_running_value() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.set_target(10.0, 10);
        for _ in 0..5 {
            ramp.advance();
        }
        // Block cut short: the next ramp starts where the last one stopped
        ramp.set_target(0.0, 5);
        assert_eq!(ramp.value(), 5.0);
        assert_eq!(ramp.increment(), -1.0);
    }

    #[test]
    fn test_snap_discards_ramp_in_progress() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.set_target(8.0, 4);
        ramp.advance();
        ramp.snap(3.0);
        assert_eq!(ramp.value(), 3.0);
        assert_eq!(ramp.increment(), 0.0);
        ramp.advance();
        assert_eq!(ramp.value(), 3.0);
    }

    #[test]
    fn test_ramp_empty_block_snaps() {
        let mut ramp = LinearRamp::new(1.0);
        ramp.set_target(3.0, 0);
        assert_eq!(ramp.value(), 3.0);
        assert_eq!(ramp.increment(), 0.0);
    }

    #[test]
    fn test_cutoff_clamp() {
        assert_eq!(clamp_cutoff(30000.0, 44100.0), 44100.0 * 0.48);
        assert_eq!(clamp_cutoff(-5.0, 44100.0), MIN_CUTOFF_HZ);
        assert_eq!(clamp_cutoff(0.0, 44100.0), MIN_CUTOFF_HZ);
        assert_eq!(clamp_cutoff(f64::NAN, 44100.0), MIN_CUTOFF_HZ);
        assert_eq!(clamp_cutoff(1000.0, 44100.0), 1000.0);
    }

    #[test]
    fn test_svf_resonance_mapping() {
        assert_eq!(svf_resonance(0.0), 1.0);
        assert!((svf_resonance(50.0) - 0.5).abs() < 1e-12);
        assert_eq!(svf_resonance(100.0), SVF_RESONANCE_MIN);
        assert_eq!(svf_resonance(-20.0), 1.0);
    }

    #[test]
    fn test_bank_resonance_mapping() {
        let sr = 44100.0;
        // Zero decay time means maximum damping
        assert_eq!(bank_resonance(0.0, sr), 1.0);
        // Negative decay would be negative damping: clamped to the floor
        assert_eq!(bank_resonance(-1.0, sr), BANK_RESONANCE_MIN);

        let short = bank_resonance(10.0, sr);
        let long = bank_resonance(1000.0, sr);
        assert!(long < short);
        assert!(long >= BANK_RESONANCE_MIN && short <= RESONANCE_MAX);

        let expected = 1.0 - ((-1000.0 / sr) / (6.91 * 10.0)).exp();
        assert!((short - expected).abs() < 1e-15);
    }

    #[test]
    fn test_brightness_clamp() {
        assert_eq!(clamp_brightness(2.0), 1.0);
        assert_eq!(clamp_brightness(-3.0), -1.0);
        assert_eq!(clamp_brightness(0.25), 0.25);
    }
}
