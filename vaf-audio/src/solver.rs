//! Classical 4th-order Runge-Kutta stepping for fixed-size state vectors
//!
//! The solver knows nothing about the filter it integrates: the derivative
//! function closes over the current control values. There is no error
//! estimate and no adaptive stepping; callers pick the step size (see
//! [`crate::Oversample`]).

/// Advance `state` by one step of size `h` and return the new state.
///
/// ```text
/// k1 = f(s)
/// k2 = f(s + h/2 k1)
/// k3 = f(s + h/2 k2)
/// k4 = f(s + h k3)
/// s' = s + h/6 (k1 + 2 k2 + 2 k3 + k4)
/// ```
#[inline]
pub fn rk4_step<const N: usize, F>(state: &[f64; N], h: f64, derivatives: F) -> [f64; N]
where
    F: Fn(&[f64; N]) -> [f64; N],
{
    let k1 = derivatives(state);
    let k2 = derivatives(&offset(state, &k1, 0.5 * h));
    let k3 = derivatives(&offset(state, &k2, 0.5 * h));
    let k4 = derivatives(&offset(state, &k3, h));

    let mut next = *state;
    for (i, s) in next.iter_mut().enumerate() {
        *s += (1.0 / 6.0) * h * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    next
}

/// `state + scale * slope`, element-wise
#[inline]
fn offset<const N: usize>(state: &[f64; N], slope: &[f64; N], scale: f64) -> [f64; N] {
    let mut out = *state;
    for (o, d) in out.iter_mut().zip(slope) {
        *o += scale * d;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decay(s: &[f64; 1]) -> [f64; 1] {
        [-s[0]]
    }

    fn integrate_decay(steps: usize) -> f64 {
        let h = 1.0 / steps as f64;
        let mut state = [1.0];
        for _ in 0..steps {
            state = rk4_step(&state, h, decay);
        }
        state[0]
    }

    #[test]
    fn test_single_step_matches_exponential() {
        let next = rk4_step(&[1.0], 0.1, decay);
        assert!((next[0] - (-0.1f64).exp()).abs() < 1e-6);
    }

    #[test]
    fn test_fourth_order_convergence() {
        let exact = (-1.0f64).exp();
        let coarse = (integrate_decay(10) - exact).abs();
        let fine = (integrate_decay(20) - exact).abs();

        // Halving h should shrink the global error by roughly 2^4
        let ratio = coarse / fine;
        assert!(ratio > 12.0 && ratio < 20.0, "ratio = {}", ratio);
    }

    #[test]
    fn test_harmonic_oscillator_keeps_energy() {
        let oscillator = |s: &[f64; 2]| [s[1], -s[0]];
        let mut state = [1.0, 0.0];
        for _ in 0..1000 {
            state = rk4_step(&state, 0.01, oscillator);
        }
        let energy = state[0] * state[0] + state[1] * state[1];
        assert!((energy - 1.0).abs() < 1e-6);
        assert!((state[0] - 10.0f64.cos()).abs() < 1e-6);
    }

    #[test]
    fn test_zero_step_is_identity() {
        let state = [0.25, -0.5, 1.0, 2.0];
        let next = rk4_step(&state, 0.0, |s: &[f64; 4]| s.map(|x| x * 3.0 + 1.0));
        assert_eq!(next, state);
    }

    #[test]
    fn test_deterministic() {
        let f = |s: &[f64; 2]| [s[1].tanh() - s[0], s[0] * 0.5];
        let a = rk4_step(&[0.3, -0.7], 0.01, f);
        let b = rk4_step(&[0.3, -0.7], 0.01, f);
        assert_eq!(a, b);
    }
}
