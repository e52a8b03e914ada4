//! Text control messages
//!
//! A message is a selector followed by whitespace-separated arguments.
//! Arguments that parse as numbers become floats, anything else is kept as a
//! symbol so list selectors can report it per entry.

use thiserror::Error;
use vaf_audio::{ControlCommand, ControlValue};

/// Why a message could not be turned into a command
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty message")]
    Empty,
    #[error("Unknown selector: {0}")]
    UnknownSelector(String),
    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),
    #[error("Argument of {selector} is not a number: {found}")]
    NotANumber { selector: &'static str, found: String },
}

fn parse_value(token: &str) -> ControlValue {
    match token.parse::<f32>() {
        Ok(v) => ControlValue::Float(v),
        Err(_) => ControlValue::Symbol(token.to_string()),
    }
}

/// First argument of a scalar selector as a number
fn scalar<'a>(
    selector: &'static str,
    mut args: impl Iterator<Item = &'a str>,
) -> Result<f32, ParseError> {
    let token = args.next().ok_or(ParseError::MissingArgument(selector))?;
    token.parse::<f32>().map_err(|_| ParseError::NotANumber {
        selector,
        found: token.to_string(),
    })
}

/// Mode number for a requested value. Only 1..=3 truncates to a valid mode;
/// anything else is rounded away from that range so the filter rejects it.
fn mode_number(value: f32) -> i32 {
    if (1.0..=3.0).contains(&value) {
        value as i32
    } else if value > 3.0 {
        value.ceil() as i32
    } else {
        // NaN lands here and becomes 0
        value.floor() as i32
    }
}

/// Parse one control message.
///
/// Integer selectors truncate toward zero (`oversample 4.7` is 4). Range
/// checks are left to the filters, which clamp, except `mode`, which must
/// lie within 1 to 3 before truncation.
pub fn parse_message(text: &str) -> Result<ControlCommand, ParseError> {
    let mut tokens = text.split_whitespace();
    let selector = tokens.next().ok_or(ParseError::Empty)?;

    let cmd = match selector {
        "oversample" => ControlCommand::Oversample(scalar("oversample", tokens)? as i32),
        "mode" => ControlCommand::Mode(mode_number(scalar("mode", tokens)?)),
        "bands" => ControlCommand::Bands(scalar("bands", tokens)? as i32),
        "gain" => ControlCommand::Gain(scalar("gain", tokens)?),
        // Only exactly 1 turns clipping on
        "softclip" => ControlCommand::SoftClip(scalar("softclip", tokens)? == 1.0),
        "freqs" => ControlCommand::Freqs(tokens.map(parse_value).collect()),
        "gains" => ControlCommand::Gains(tokens.map(parse_value).collect()),
        "clear" => ControlCommand::Clear,
        "print" => ControlCommand::Print,
        "stop" | "quit" => ControlCommand::Shutdown,
        other => return Err(ParseError::UnknownSelector(other.to_string())),
    };

    Ok(cmd)
}
