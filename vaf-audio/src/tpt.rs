//! Zero-delay-feedback state-variable core (topology-preserving transform)
//!
//! Two trapezoidal integrators in a feedback loop. The instantaneous loop is
//! solved in closed form with a single division, so all three outputs come
//! out of one state pair without iteration.

use std::f64::consts::TAU;

/// Integrator states of one ZDF state-variable filter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TptState {
    pub s1: f64,
    pub s2: f64,
}

/// Simultaneous outputs of one solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfFrame {
    pub lp: f64,
    pub bp: f64,
    pub hp: f64,
}

/// Prewarped integrator gain `g` for `cutoff` Hz at `sample_rate`.
///
/// `wd = 2 pi fc`, `wa = 2 fs tan(wd T / 2)`, `g = wa T / 2`.
#[inline]
pub fn prewarp_gain(cutoff: f64, sample_rate: f64) -> f64 {
    let period = 1.0 / sample_rate;
    let wd = TAU * cutoff;
    let wa = 2.0 * sample_rate * (wd * period * 0.5).tan();
    wa * period * 0.5
}

impl TptState {
    /// Solve one sample. `resonance` is the damping term `R` of the loop and
    /// must be non-negative so that `1 + 2Rg + g^2` stays positive.
    #[inline]
    pub fn tick(&mut self, input: f64, g: f64, resonance: f64) -> SvfFrame {
        let hp = (input - 2.0 * resonance * self.s1 - g * self.s1 - self.s2)
            / (1.0 + 2.0 * resonance * g + g * g);
        let bp = g * hp + self.s1;
        self.s1 = g * hp + bp;
        let lp = g * bp + self.s2;
        self.s2 = g * bp + lp;
        SvfFrame { lp, bp, hp }
    }

    pub fn clear(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }

    pub fn is_zero(&self) -> bool {
        self.s1 == 0.0 && self.s2 == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prewarp_matches_tangent() {
        let g = prewarp_gain(1000.0, 48000.0);
        let expected = (std::f64::consts::PI * 1000.0 / 48000.0).tan();
        assert!((g - expected).abs() < 1e-12);
        assert_eq!(prewarp_gain(0.0, 48000.0), 0.0);
    }

    #[test]
    fn test_solve_satisfies_loop_equation() {
        let mut state = TptState::default();
        let g = prewarp_gain(2500.0, 44100.0);
        let resonance = 0.3;

        for i in 0..256 {
            let input = ((i as f64) * 0.37).sin();
            let prev = state;
            let frame = state.tick(input, g, resonance);
            let rebuilt = frame.hp * (1.0 + 2.0 * resonance * g + g * g)
                + 2.0 * resonance * prev.s1
                + g * prev.s1
                + prev.s2;
            assert!((rebuilt - input).abs() < 1e-9);
        }
    }

    #[test]
    fn test_outputs_sum_to_input() {
        // For the SVF, hp + 2R bp + lp reconstructs the input
        let mut state = TptState::default();
        let g = prewarp_gain(800.0, 48000.0);
        let resonance = 0.5;
        for i in 0..64 {
            let input = if i == 0 { 1.0 } else { 0.0 };
            let f = state.tick(input, g, resonance);
            assert!((f.hp + 2.0 * resonance * f.bp + f.lp - input).abs() < 1e-9);
        }
    }

    #[test]
    fn test_lowpass_dc_gain_is_unity() {
        let mut state = TptState::default();
        let g = prewarp_gain(1000.0, 48000.0);
        let mut frame = state.tick(1.0, g, 0.7);
        for _ in 0..20000 {
            frame = state.tick(1.0, g, 0.7);
        }
        assert!((frame.lp - 1.0).abs() < 1e-6);
        assert!(frame.hp.abs() < 1e-6);
        assert!(frame.bp.abs() < 1e-6);
    }

    #[test]
    fn test_zero_in_zero_out() {
        let mut state = TptState::default();
        let g = prewarp_gain(10000.0, 44100.0);
        for _ in 0..100 {
            let f = state.tick(0.0, g, 0.00002);
            assert_eq!((f.lp, f.bp, f.hp), (0.0, 0.0, 0.0));
        }
        assert!(state.is_zero());
    }
}
