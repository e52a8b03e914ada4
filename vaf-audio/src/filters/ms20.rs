//! MS20-style 2-pole nonlinear filter
//!
//! Two saturating integrators with tanh resonance feedback, integrated with
//! RK4 at an oversampled rate. Three topologies share the same state pair:
//! low-pass, band-pass and high-pass.

use tracing::warn;

use super::{run_rk4, ControlInputs, FilterCore};
use crate::control::ControlError;
use crate::defaults::FilterDefaults;
use crate::models::{Ms20BandPass, Ms20HighPass, Ms20LowPass};
use crate::oversample::Oversample;
use crate::status::FilterStatus;

/// MS20 topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ms20Mode {
    #[default]
    LowPass = 1,
    BandPass = 2,
    HighPass = 3,
}

impl Ms20Mode {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Ms20Mode::LowPass => "low pass",
            Ms20Mode::BandPass => "band pass",
            Ms20Mode::HighPass => "high pass",
        }
    }

    /// Control number of the mode (1-3)
    pub fn number(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for Ms20Mode {
    type Error = ControlError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Ms20Mode::LowPass),
            2 => Ok(Ms20Mode::BandPass),
            3 => Ok(Ms20Mode::HighPass),
            other => Err(ControlError::InvalidMode(other)),
        }
    }
}

/// MS20-style filter instance
pub struct Ms20Filter {
    state: [f64; 2],
    oversample: Oversample,
    mode: Ms20Mode,
}

impl Ms20Filter {
    /// Create a filter with zeroed state, low-pass mode, 2x oversampling
    pub fn new() -> Self {
        Self::with_defaults(&FilterDefaults::default())
    }

    pub fn with_defaults(defaults: &FilterDefaults) -> Self {
        Self {
            state: [0.0; 2],
            oversample: Oversample::new(defaults.oversample),
            mode: defaults.mode,
        }
    }

    /// Set the oversample factor (clamped to 1-8), returning the effective factor
    pub fn set_oversample(&mut self, requested: i32) -> usize {
        self.oversample = Oversample::new(requested);
        self.oversample.factor()
    }

    /// Get oversample factor
    pub fn oversample(&self) -> usize {
        self.oversample.factor()
    }

    /// Select a mode by control number (1 = LP, 2 = BP, 3 = HP).
    ///
    /// Invalid numbers leave the current mode and state untouched.
    pub fn set_mode(&mut self, requested: i32) -> Result<(), ControlError> {
        match Ms20Mode::try_from(requested) {
            Ok(mode) => {
                self.select_mode(mode);
                Ok(())
            }
            Err(err) => {
                warn!(filter = self.name(), "{}", err);
                Err(err)
            }
        }
    }

    /// Switch topology. The state is cleared even if the mode is unchanged.
    pub fn select_mode(&mut self, mode: Ms20Mode) {
        self.state = [0.0; 2];
        self.mode = mode;
    }

    /// Get mode
    pub fn mode(&self) -> Ms20Mode {
        self.mode
    }

    pub fn state(&self) -> &[f64; 2] {
        &self.state
    }

    /// Process one block. The mode is dispatched once per block.
    pub fn process(&mut self, sample_rate: f64, block: ControlInputs<'_>, out: &mut [f32]) {
        match self.mode {
            Ms20Mode::LowPass => {
                run_rk4::<2, Ms20LowPass>(&mut self.state, self.oversample, sample_rate, &block, out)
            }
            Ms20Mode::BandPass => {
                run_rk4::<2, Ms20BandPass>(&mut self.state, self.oversample, sample_rate, &block, out)
            }
            Ms20Mode::HighPass => {
                run_rk4::<2, Ms20HighPass>(&mut self.state, self.oversample, sample_rate, &block, out)
            }
        }
    }
}

impl Default for Ms20Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCore for Ms20Filter {
    fn reset(&mut self) {
        self.state = [0.0; 2];
    }

    fn name(&self) -> &'static str {
        "ms20"
    }

    fn status(&self) -> FilterStatus {
        FilterStatus::Rk4 {
            mode: Some(self.mode),
            state: self.state.to_vec(),
            oversample: self.oversample.factor(),
        }
    }
}
