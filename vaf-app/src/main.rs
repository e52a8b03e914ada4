//! VAF - offline host harness for the filter cores
//!
//! Renders a test signal through one filter, block by block, applying control
//! messages between blocks and logging output levels.

mod config;
mod signal;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use vaf_audio::{
    ControlCommand, ControlInputs, EngineState, FilterDefaults, FilterEngine, FilterModel,
    SvfOutput,
};
use vaf_input::{parse_message, ControlScript};

use config::RenderConfig;
use signal::{SignalGenerator, SignalKind};

/// Render a test signal through an analog-modelled filter.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Render config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Filter model: ms20, ota, svf, ring64
    #[arg(short, long)]
    model: Option<String>,

    /// Sample rate in Hz
    #[arg(short, long)]
    sample_rate: Option<f64>,

    /// Samples per block
    #[arg(short, long)]
    block_size: Option<usize>,

    /// Render length in seconds
    #[arg(long)]
    seconds: Option<f64>,

    /// Test signal: step, impulse, saw, noise
    #[arg(long)]
    signal: Option<String>,

    /// Saw frequency in Hz
    #[arg(long)]
    signal_freq: Option<f64>,

    #[arg(long)]
    amplitude: Option<f32>,

    /// Cutoff in Hz
    #[arg(long)]
    cutoff: Option<f32>,

    /// Raw resonance control
    #[arg(long, allow_negative_numbers = true)]
    resonance: Option<f32>,

    /// Resonator bank tilt, -1 to 1
    #[arg(long, allow_negative_numbers = true)]
    brightness: Option<f32>,

    /// SVF output routed to the render: lp, bp, hp
    #[arg(long)]
    svf_output: Option<String>,

    /// Control script with `@<block> <message>` lines
    #[arg(long)]
    script: Option<PathBuf>,

    /// Control message applied before the first block (repeatable), e.g. -e "oversample 4"
    #[arg(short = 'e', long = "exec")]
    messages: Vec<String>,
}

impl Cli {
    /// Command-line flags override config file values
    fn apply(&self, config: &mut RenderConfig) -> anyhow::Result<()> {
        if let Some(name) = &self.model {
            config.model = FilterModel::from_name(name)
                .with_context(|| format!("Unknown filter model: {}", name))?;
        }
        if let Some(name) = &self.signal {
            config.signal = SignalKind::from_name(name)
                .with_context(|| format!("Unknown signal: {}", name))?;
        }
        if let Some(name) = &self.svf_output {
            config.svf_output = SvfOutput::from_name(name)
                .with_context(|| format!("Unknown SVF output: {}", name))?;
        }
        if let Some(v) = self.sample_rate {
            config.sample_rate = v;
        }
        if let Some(v) = self.block_size {
            config.block_size = v;
        }
        if let Some(v) = self.seconds {
            config.seconds = v;
        }
        if let Some(v) = self.signal_freq {
            config.signal_freq = v;
        }
        if let Some(v) = self.amplitude {
            config.amplitude = v;
        }
        if let Some(v) = self.cutoff {
            config.cutoff = v;
        }
        if let Some(v) = self.resonance {
            config.resonance = v;
        }
        if let Some(v) = self.brightness {
            config.brightness = v;
        }
        Ok(())
    }
}

/// Output level statistics
#[derive(Debug, Default)]
struct Levels {
    peak: f32,
    sum_squares: f64,
    samples: usize,
    non_finite: usize,
}

impl Levels {
    fn measure(samples: &[f32]) -> Self {
        let mut levels = Self::default();
        levels.add(samples);
        levels
    }

    fn add(&mut self, samples: &[f32]) {
        for &s in samples {
            if !s.is_finite() {
                self.non_finite += 1;
                continue;
            }
            self.peak = self.peak.max(s.abs());
            self.sum_squares += f64::from(s) * f64::from(s);
        }
        self.samples += samples.len();
    }

    fn rms(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            (self.sum_squares / self.samples as f64).sqrt()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RenderConfig::load_from(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => RenderConfig::load(),
    };
    cli.apply(&mut config)?;

    if !(config.sample_rate.is_finite() && config.sample_rate > 0.0) {
        bail!("Sample rate must be positive, got {}", config.sample_rate);
    }
    if config.block_size == 0 {
        bail!("Block size must be at least 1");
    }

    let mut script = match &cli.script {
        Some(path) => {
            let (script, errors) = ControlScript::load(path)
                .with_context(|| format!("Failed to load script {}", path.display()))?;
            if !errors.is_empty() {
                warn!(skipped = errors.len(), "control script lines skipped");
            }
            script
        }
        None => ControlScript::default(),
    };

    // Create command channel
    let (cmd_tx, cmd_rx) = FilterEngine::create_channel();
    let engine = FilterEngine::new(cmd_tx);

    for message in &cli.messages {
        match parse_message(message) {
            Ok(cmd) => engine.send(cmd),
            Err(e) => warn!(message = message.as_str(), "{}", e),
        }
    }

    info!(
        model = config.model.display_name(),
        sample_rate = config.sample_rate,
        block_size = config.block_size,
        signal = config.signal.display_name(),
        "rendering"
    );

    let levels = render(&config, &engine, &cmd_rx, &mut script);

    info!(
        samples = levels.samples,
        peak = levels.peak,
        rms = levels.rms(),
        non_finite = levels.non_finite,
        "render finished"
    );

    Ok(())
}

/// Run the block loop until the render length is reached or shutdown is requested
fn render(
    config: &RenderConfig,
    engine: &FilterEngine,
    cmd_rx: &Receiver<ControlCommand>,
    script: &mut ControlScript,
) -> Levels {
    let mut state = EngineState::new(config.model, config.sample_rate, &FilterDefaults::default());
    state.set_svf_output(config.svf_output);

    let mut signal = SignalGenerator::new(
        config.signal,
        config.amplitude,
        config.signal_freq,
        config.sample_rate,
    );

    let block_size = config.block_size;
    let mut input = vec![0.0f32; block_size];
    let mut output = vec![0.0f32; block_size];
    let cutoff = vec![config.cutoff; block_size];
    let resonance = vec![config.resonance; block_size];
    let brightness = vec![config.brightness; block_size];

    let total = config.total_samples();
    let mut levels = Levels::default();
    let mut block = 0usize;
    let mut rendered = 0usize;

    while rendered < total && !engine.is_shutdown() {
        for scheduled in script.due(block) {
            engine.send(scheduled.command.clone());
        }
        if !state.drain_commands(cmd_rx) {
            engine.shutdown();
            info!(block, "shutdown requested");
            break;
        }

        let n = block_size.min(total - rendered);
        signal.fill(&mut input[..n]);
        state.process(
            ControlInputs::new(&input[..n], &cutoff[..n], &resonance[..n]),
            &brightness[..n],
            &mut output[..n],
        );

        let block_levels = Levels::measure(&output[..n]);
        debug!(block, peak = block_levels.peak, rms = block_levels.rms(), "block");
        levels.add(&output[..n]);

        rendered += n;
        block += 1;
    }

    levels
}
