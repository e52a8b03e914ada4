//! Control message parsing for VAF
//!
//! Turns text control messages (`oversample 4`, `freqs 1 1.5 2`) into engine
//! commands, and reads control scripts that schedule messages at block
//! boundaries.

mod message;
mod script;

pub use message::{parse_message, ParseError};
pub use script::{ControlScript, ScheduledCommand, ScriptError};
