//! Test signal generators for offline renders

/// Test signal shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalKind {
    /// Constant `amplitude` from the first sample on
    #[default]
    Step,
    /// One sample of `amplitude`, then silence
    Impulse,
    /// Rising sawtooth at `signal_freq`
    Saw,
    /// White noise
    Noise,
}

impl SignalKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "step" => Some(SignalKind::Step),
            "impulse" => Some(SignalKind::Impulse),
            "saw" => Some(SignalKind::Saw),
            "noise" => Some(SignalKind::Noise),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SignalKind::Step => "step",
            SignalKind::Impulse => "impulse",
            SignalKind::Saw => "saw",
            SignalKind::Noise => "noise",
        }
    }
}

/// Block-wise signal source
pub struct SignalGenerator {
    kind: SignalKind,
    amplitude: f32,
    phase: f64,
    phase_inc: f64,
    position: u64,
    // PRNG state (deterministic, no allocation)
    random_state: u64,
}

impl SignalGenerator {
    pub fn new(kind: SignalKind, amplitude: f32, frequency: f64, sample_rate: f64) -> Self {
        Self {
            kind,
            amplitude,
            phase: 0.0,
            phase_inc: (frequency / sample_rate).clamp(0.0, 0.5),
            position: 0,
            random_state: 0xDEADBEEF_CAFEBABE,
        }
    }

    /// Fast xorshift64, uniform in [-1, 1]
    #[inline]
    fn white_noise(&mut self) -> f32 {
        self.random_state ^= self.random_state << 13;
        self.random_state ^= self.random_state >> 7;
        self.random_state ^= self.random_state << 17;
        (self.random_state as f32) / (u64::MAX as f32) * 2.0 - 1.0
    }

    /// Write the next `out.len()` samples
    pub fn fill(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let value = match self.kind {
                SignalKind::Step => 1.0,
                SignalKind::Impulse => {
                    if self.position == 0 {
                        1.0
                    } else {
                        0.0
                    }
                }
                SignalKind::Saw => {
                    let value = (2.0 * self.phase - 1.0) as f32;
                    self.phase += self.phase_inc;
                    if self.phase >= 1.0 {
                        self.phase -= 1.0;
                    }
                    value
                }
                SignalKind::Noise => self.white_noise(),
            };
            *sample = value * self.amplitude;
            self.position += 1;
        }
    }
}
