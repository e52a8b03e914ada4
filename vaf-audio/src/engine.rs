//! Filter engine - applies control commands between blocks and renders blocks
//!
//! Control commands travel over a bounded channel and are drained before
//! each block, never during one. A block therefore always sees a stable
//! configuration.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::control::ControlValue;
use crate::defaults::FilterDefaults;
use crate::filters::{
    ControlInputs, FilterCore, Ms20Filter, OtaLadderFilter, ResonatorBank, SvfOutput, ZdfSvf,
};
use crate::status::FilterStatus;

/// Which filter an engine hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterModel {
    /// 2-pole MS20-style, RK4
    #[default]
    Ms20,
    /// 4-pole OTA ladder, RK4
    Ota,
    /// ZDF state-variable filter
    Svf,
    /// 64-band ZDF resonator bank
    Ring64,
}

impl FilterModel {
    /// Parse a model name (`ms20`, `ota`, `svf`, `ring64`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ms20" | "fumio" => Some(FilterModel::Ms20),
            "ota" | "ladder" => Some(FilterModel::Ota),
            "svf" | "zdsv" => Some(FilterModel::Svf),
            "ring64" | "bank" => Some(FilterModel::Ring64),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterModel::Ms20 => "ms20",
            FilterModel::Ota => "ota",
            FilterModel::Svf => "svf",
            FilterModel::Ring64 => "ring64",
        }
    }
}

/// Control commands delivered between blocks
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// RK4 filters: oversample factor (clamped 1-8)
    Oversample(i32),
    /// MS20: 1 = low pass, 2 = band pass, 3 = high pass
    Mode(i32),
    /// Zero the filter state
    Clear,
    /// Log the filter status
    Print,
    /// Bank: active band count (clamped 1-64)
    Bands(i32),
    /// Bank: per-band frequency multipliers
    Freqs(Vec<ControlValue>),
    /// Bank: per-band gains (each clamped 0-16)
    Gains(Vec<ControlValue>),
    /// Bank: overall gain (clamped 0-2)
    Gain(f32),
    /// Bank: soft clipping on/off
    SoftClip(bool),
    /// Stop the render loop
    Shutdown,
}

/// The one filter instance an engine owns
pub enum FilterInstance {
    Ms20(Ms20Filter),
    Ota(OtaLadderFilter),
    Svf(ZdfSvf),
    Ring64(Box<ResonatorBank>),
}

impl FilterInstance {
    pub fn new(model: FilterModel, defaults: &FilterDefaults) -> Self {
        match model {
            FilterModel::Ms20 => FilterInstance::Ms20(Ms20Filter::with_defaults(defaults)),
            FilterModel::Ota => FilterInstance::Ota(OtaLadderFilter::with_defaults(defaults)),
            FilterModel::Svf => FilterInstance::Svf(ZdfSvf::new()),
            FilterModel::Ring64 => {
                FilterInstance::Ring64(Box::new(ResonatorBank::with_defaults(defaults)))
            }
        }
    }

    pub fn model(&self) -> FilterModel {
        match self {
            FilterInstance::Ms20(_) => FilterModel::Ms20,
            FilterInstance::Ota(_) => FilterModel::Ota,
            FilterInstance::Svf(_) => FilterModel::Svf,
            FilterInstance::Ring64(_) => FilterModel::Ring64,
        }
    }

    fn core(&self) -> &dyn FilterCore {
        match self {
            FilterInstance::Ms20(f) => f,
            FilterInstance::Ota(f) => f,
            FilterInstance::Svf(f) => f,
            FilterInstance::Ring64(f) => &**f,
        }
    }

    fn core_mut(&mut self) -> &mut dyn FilterCore {
        match self {
            FilterInstance::Ms20(f) => f,
            FilterInstance::Ota(f) => f,
            FilterInstance::Svf(f) => f,
            FilterInstance::Ring64(f) => &mut **f,
        }
    }
}

/// Engine state (held by the thread that renders blocks)
pub struct EngineState {
    instance: FilterInstance,
    sample_rate: f64,
    /// SVF response routed to the output
    svf_output: SvfOutput,
}

impl EngineState {
    pub fn new(model: FilterModel, sample_rate: f64, defaults: &FilterDefaults) -> Self {
        Self {
            instance: FilterInstance::new(model, defaults),
            sample_rate,
            svf_output: SvfOutput::default(),
        }
    }

    pub fn instance(&self) -> &FilterInstance {
        &self.instance
    }

    pub fn set_svf_output(&mut self, output: SvfOutput) {
        self.svf_output = output;
    }

    pub fn status(&self) -> FilterStatus {
        self.instance.core().status()
    }

    /// Apply one control command
    pub fn handle_command(&mut self, cmd: ControlCommand) {
        let model = self.instance.model();
        match (&mut self.instance, cmd) {
            (FilterInstance::Ms20(f), ControlCommand::Oversample(n)) => {
                f.set_oversample(n);
            }
            (FilterInstance::Ota(f), ControlCommand::Oversample(n)) => {
                f.set_oversample(n);
            }
            (FilterInstance::Ms20(f), ControlCommand::Mode(mode)) => {
                // Rejected modes are logged by the filter
                let _ = f.set_mode(mode);
            }
            (instance, ControlCommand::Clear) => instance.core_mut().reset(),
            (instance, ControlCommand::Print) => instance.core().print(),
            (FilterInstance::Ring64(bank), ControlCommand::Bands(n)) => {
                bank.set_bands(n);
            }
            (FilterInstance::Ring64(bank), ControlCommand::Freqs(values)) => {
                bank.set_freqs(&values);
            }
            (FilterInstance::Ring64(bank), ControlCommand::Gains(values)) => {
                bank.set_gains(&values);
            }
            (FilterInstance::Ring64(bank), ControlCommand::Gain(gain)) => {
                bank.set_gain(f64::from(gain));
            }
            (FilterInstance::Ring64(bank), ControlCommand::SoftClip(enabled)) => {
                bank.set_softclip(enabled);
            }
            (_, ControlCommand::Shutdown) => {}
            (_, cmd) => {
                debug!(model = model.display_name(), ?cmd, "command not supported by model, ignored");
            }
        }
    }

    /// Apply every pending command. Returns `false` once shutdown was requested
    /// or the sending side is gone.
    pub fn drain_commands(&mut self, rx: &Receiver<ControlCommand>) -> bool {
        loop {
            match rx.try_recv() {
                Ok(ControlCommand::Shutdown) => return false,
                Ok(cmd) => self.handle_command(cmd),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    /// Render one block. `brightness` is only read by the resonator bank.
    pub fn process(&mut self, block: ControlInputs<'_>, brightness: &[f32], output: &mut [f32]) {
        let sample_rate = self.sample_rate;
        match &mut self.instance {
            FilterInstance::Ms20(f) => f.process(sample_rate, block, output),
            FilterInstance::Ota(f) => f.process(sample_rate, block, output),
            FilterInstance::Ring64(bank) => bank.process(sample_rate, block, brightness, output),
            FilterInstance::Svf(f) => f.process_output(sample_rate, block, self.svf_output, output),
        }
    }
}

/// Handle to send control commands to a rendering engine
pub struct FilterEngine {
    /// Send commands to the render thread
    pub command_tx: Sender<ControlCommand>,
    /// Shutdown flag
    shutdown: Arc<AtomicBool>,
}

impl FilterEngine {
    /// Create the command channel.
    /// Buffer size of 1024 provides headroom for command bursts without saturation
    pub fn create_channel() -> (Sender<ControlCommand>, Receiver<ControlCommand>) {
        bounded(1024)
    }

    /// Create a new engine handle
    pub fn new(command_tx: Sender<ControlCommand>) -> Self {
        Self {
            command_tx,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send a command; dropped if the channel is full
    pub fn send(&self, cmd: ControlCommand) {
        let _ = self.command_tx.try_send(cmd);
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.command_tx.try_send(ControlCommand::Shutdown);
    }
}
