//! Control scripts: messages scheduled at block boundaries
//!
//! One message per line, optionally prefixed with `@<block>`:
//!
//! ```text
//! # open up the filter after one second at 512-sample blocks
//! mode 2
//! @86 oversample 4
//! @86 print
//! ```
//!
//! Lines without a prefix run before the first block. `#` starts a comment.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;
use vaf_audio::ControlCommand;

use crate::message::{parse_message, ParseError};

/// A script line that was skipped
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Line {line}: {source}")]
    Message {
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("Line {line}: invalid block number '{found}'")]
    InvalidBlock { line: usize, found: String },
    #[error("Failed to read control script: {0}")]
    Io(#[from] std::io::Error),
}

/// A command and the block before which it is applied
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCommand {
    pub block: usize,
    pub command: ControlCommand,
}

/// Parsed control script, consumed block by block
#[derive(Debug, Clone, Default)]
pub struct ControlScript {
    commands: Vec<ScheduledCommand>,
    cursor: usize,
}

impl ControlScript {
    /// Parse script text. Bad lines are skipped and reported; the rest is kept.
    pub fn parse(text: &str) -> (Self, Vec<ScriptError>) {
        let mut commands = Vec::new();
        let mut errors = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            }
            .trim();
            if content.is_empty() {
                continue;
            }

            let (block, message) = match content.strip_prefix('@') {
                Some(rest) => {
                    let (number, message) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                    match number.parse::<usize>() {
                        Ok(block) => (block, message),
                        Err(_) => {
                            errors.push(ScriptError::InvalidBlock {
                                line,
                                found: number.to_string(),
                            });
                            continue;
                        }
                    }
                }
                None => (0, content),
            };

            match parse_message(message) {
                Ok(command) => commands.push(ScheduledCommand { block, command }),
                Err(source) => errors.push(ScriptError::Message { line, source }),
            }
        }

        // Stable: same-block commands keep file order
        commands.sort_by_key(|c| c.block);

        for error in &errors {
            warn!("{}", error);
        }

        (Self { commands, cursor: 0 }, errors)
    }

    /// Read and parse a script file
    pub fn load(path: &Path) -> Result<(Self, Vec<ScriptError>), ScriptError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Commands due before `block`, each returned once
    pub fn due(&mut self, block: usize) -> &[ScheduledCommand] {
        let start = self.cursor;
        while self
            .commands
            .get(self.cursor)
            .is_some_and(|c| c.block <= block)
        {
            self.cursor += 1;
        }
        &self.commands[start..self.cursor]
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether every command has been handed out
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schedules_in_block_order() {
        let (script, errors) = ControlScript::parse(
            "@10 print\n\
             mode 3   # high pass\n\
             \n\
             # comment only\n\
             @2 oversample 8\n\
             @10 clear\n",
        );
        assert!(errors.is_empty());
        assert_eq!(script.len(), 4);

        let blocks: Vec<usize> = script.commands.iter().map(|c| c.block).collect();
        assert_eq!(blocks, vec![0, 2, 10, 10]);
        assert_eq!(script.commands[2].command, ControlCommand::Print);
        assert_eq!(script.commands[3].command, ControlCommand::Clear);
    }

    #[test]
    fn test_bad_lines_reported_and_skipped() {
        let (script, errors) = ControlScript::parse("@x print\nwobble 3\n@4 bands 8\n@5\n");
        assert_eq!(script.len(), 1);
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ScriptError::InvalidBlock { line: 1, .. }));
        assert!(matches!(
            errors[1],
            ScriptError::Message {
                line: 2,
                source: ParseError::UnknownSelector(_)
            }
        ));
        assert!(matches!(
            errors[2],
            ScriptError::Message {
                line: 4,
                source: ParseError::Empty
            }
        ));
    }

    #[test]
    fn test_due_hands_out_each_command_once() {
        let (mut script, _) = ControlScript::parse("clear\n@3 mode 2\n@3 print\n@7 stop\n");

        assert_eq!(script.due(0).len(), 1);
        assert!(script.due(1).is_empty());
        assert!(script.due(2).is_empty());

        let due: Vec<ControlCommand> = script.due(5).iter().map(|c| c.command.clone()).collect();
        assert_eq!(due, vec![ControlCommand::Mode(2), ControlCommand::Print]);
        assert!(!script.is_finished());

        assert_eq!(script.due(100)[0].command, ControlCommand::Shutdown);
        assert!(script.is_finished());
        assert!(script.due(200).is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ControlScript::load(Path::new("/nonexistent/vaf/script.txt"));
        assert!(matches!(result, Err(ScriptError::Io(_))));
    }
}
