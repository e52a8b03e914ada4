//! Filter cores for VAF - analog-modeled filters for block-based hosts
//!
//! This crate provides the numerical engine behind the filters:
//! - Solver: fixed-step 4th-order Runge-Kutta for small state vectors
//! - Models: nonlinear MS20-style and OTA ladder derivative functions
//! - Filters: RK4 filters with oversampling, a ZDF state-variable filter,
//!   and a 64-band ZDF resonator bank
//! - Smoothing: per-block linear ramps and control remapping
//! - Engine: applies control commands between blocks and renders blocks

mod control;
mod defaults;
mod engine;
mod filters;
pub mod models;
mod oversample;
pub mod smoothing;
pub mod softclip;
pub mod solver;
mod status;
pub mod tpt;

pub use control::{ControlError, ControlValue};
pub use defaults::FilterDefaults;
pub use engine::{ControlCommand, EngineState, FilterEngine, FilterInstance, FilterModel};
pub use filters::{
    ControlInputs, FilterCore, Ms20Filter, Ms20Mode, OtaLadderFilter, ResonatorBank, SvfOutput,
    SvfOutputs, ZdfSvf, DEFAULT_BANDS, DEFAULT_OUTPUT_GAIN, MAX_BANDS, MAX_BAND_GAIN, MAX_OUTPUT_GAIN,
};
pub use oversample::{Oversample, DEFAULT_OVERSAMPLE, MAX_OVERSAMPLE, MIN_OVERSAMPLE};
pub use status::FilterStatus;
