//! Introspection snapshots reported by the `print` control operation

use std::fmt;

use tracing::info;

use crate::filters::Ms20Mode;

/// Snapshot of a filter instance
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStatus {
    /// RK4 filters: mode (MS20 only), state vector, oversample factor
    Rk4 {
        mode: Option<Ms20Mode>,
        state: Vec<f64>,
        oversample: usize,
    },
    /// ZDF state-variable filter: running control values and integrator states
    Svf {
        cutoff: f64,
        resonance: f64,
        s1: f64,
        s2: f64,
    },
    /// Resonator bank configuration
    Bank {
        bands: usize,
        softclip: bool,
        gain: f64,
    },
}

impl FilterStatus {
    /// Emit the snapshot through the log
    pub fn log(&self, filter: &str) {
        info!(filter, "{}", self);
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStatus::Rk4 {
                mode,
                state,
                oversample,
            } => {
                if let Some(mode) = mode {
                    write!(f, "mode: {}, ", mode.display_name())?;
                }
                for (i, s) in state.iter().enumerate() {
                    write!(f, "state {}: {:.6}, ", i, s)?;
                }
                write!(f, "oversample {}", oversample)
            }
            FilterStatus::Svf {
                cutoff,
                resonance,
                s1,
                s2,
            } => write!(
                f,
                "cutoff {:.3} Hz, resonance {:.5}, s1: {:.6}, s2: {:.6}",
                cutoff, resonance, s1, s2
            ),
            FilterStatus::Bank {
                bands,
                softclip,
                gain,
            } => write!(
                f,
                "{} bands, soft clip {}, gain {:.2}",
                bands,
                if *softclip { "ON" } else { "OFF" },
                gain
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rk4_display() {
        let status = FilterStatus::Rk4 {
            mode: Some(Ms20Mode::HighPass),
            state: vec![0.0, 0.5],
            oversample: 2,
        };
        assert_eq!(
            status.to_string(),
            "mode: high pass, state 0: 0.000000, state 1: 0.500000, oversample 2"
        );
    }

    #[test]
    fn test_bank_display() {
        let status = FilterStatus::Bank {
            bands: 16,
            softclip: false,
            gain: 0.9,
        };
        assert_eq!(status.to_string(), "16 bands, soft clip OFF, gain 0.90");
    }
}
