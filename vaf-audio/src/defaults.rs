//! Construction defaults for filter instances

use crate::filters::{Ms20Mode, DEFAULT_BANDS, DEFAULT_OUTPUT_GAIN};
use crate::oversample::DEFAULT_OVERSAMPLE;

/// Values a new filter instance starts from.
///
/// Each field goes through the same clamping as the matching control
/// operation, so out-of-range defaults are corrected rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDefaults {
    /// RK4 filters
    pub oversample: i32,
    /// MS20 filter
    pub mode: Ms20Mode,
    /// Resonator bank: active band count
    pub bands: i32,
    /// Resonator bank: overall output gain
    pub gain: f64,
    /// Resonator bank: soft clipping on the mixed output
    pub softclip: bool,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            oversample: DEFAULT_OVERSAMPLE as i32,
            mode: Ms20Mode::LowPass,
            bands: DEFAULT_BANDS as i32,
            gain: DEFAULT_OUTPUT_GAIN,
            softclip: false,
        }
    }
}
