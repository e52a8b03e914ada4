//! Render configuration for the offline harness
//!
//! Simple key=value file under the user config directory. Missing file or
//! missing keys fall back to defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use vaf_audio::{FilterModel, SvfOutput};

use crate::signal::SignalKind;

/// Offline render settings
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub model: FilterModel,
    pub sample_rate: f64,
    pub block_size: usize,
    pub seconds: f64,
    pub signal: SignalKind,
    /// Hz, used by the saw signal
    pub signal_freq: f64,
    pub amplitude: f32,
    /// Hz
    pub cutoff: f32,
    /// Raw resonance control, meaning depends on the model
    pub resonance: f32,
    /// Resonator bank only
    pub brightness: f32,
    /// SVF only
    pub svf_output: SvfOutput,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            model: FilterModel::Ms20,
            sample_rate: 44100.0,
            block_size: 64,
            seconds: 1.0,
            signal: SignalKind::Saw,
            signal_freq: 110.0,
            amplitude: 0.5,
            cutoff: 1000.0,
            resonance: 0.0,
            brightness: 0.0,
            svf_output: SvfOutput::LowPass,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str, slot: &mut T) {
    match value.parse() {
        Ok(v) => *slot = v,
        Err(_) => warn!(key, value, "ignoring malformed config value"),
    }
}

fn parse_named<T>(key: &str, value: &str, slot: &mut T, from_name: impl Fn(&str) -> Option<T>) {
    match from_name(value) {
        Some(v) => *slot = v,
        None => warn!(key, value, "ignoring unknown config value"),
    }
}

impl RenderConfig {
    /// Load config from the default location
    ///
    /// Returns default config if file doesn't exist or can't be read.
    pub fn load() -> Self {
        let path = Self::config_path();
        Self::load_from(&path).unwrap_or_default()
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vaf")
            .join("render.conf")
    }

    /// Total samples to render
    pub fn total_samples(&self) -> usize {
        (self.seconds.max(0.0) * self.sample_rate.max(0.0)).round() as usize
    }

    /// Parse config from simple key=value format
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "model" => parse_named(key, value, &mut config.model, FilterModel::from_name),
                "sample_rate" => parse_number(key, value, &mut config.sample_rate),
                "block_size" => parse_number(key, value, &mut config.block_size),
                "seconds" => parse_number(key, value, &mut config.seconds),
                "signal" => parse_named(key, value, &mut config.signal, SignalKind::from_name),
                "signal_freq" => parse_number(key, value, &mut config.signal_freq),
                "amplitude" => parse_number(key, value, &mut config.amplitude),
                "cutoff" => parse_number(key, value, &mut config.cutoff),
                "resonance" => parse_number(key, value, &mut config.resonance),
                "brightness" => parse_number(key, value, &mut config.brightness),
                "svf_output" => {
                    parse_named(key, value, &mut config.svf_output, SvfOutput::from_name)
                }
                _ => {} // Ignore unknown keys
            }
        }

        config
    }
}
