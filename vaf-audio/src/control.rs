//! Control values and rejected-control diagnostics
//!
//! Control operations never fail a block. Out-of-range numbers are clamped;
//! entries that cannot be used are skipped, logged, and handed back to the
//! caller as [`ControlError`]s.

use thiserror::Error;
use tracing::warn;

/// One entry of a control message argument list
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    Float(f32),
    Symbol(String),
}

impl From<f32> for ControlValue {
    fn from(value: f32) -> Self {
        ControlValue::Float(value)
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        ControlValue::Symbol(value.to_string())
    }
}

/// A control entry that was ignored
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("Wrong argument type at index {index}: {found}")]
    WrongArgumentType { index: usize, found: String },
    #[error("Invalid mode {0} (expected 1 = low pass, 2 = band pass, 3 = high pass)")]
    InvalidMode(i32),
    #[error("Band index {index} out of range ({capacity} bands available)")]
    BandIndexOutOfRange { index: usize, capacity: usize },
    #[error("Non-finite value at index {index}")]
    NonFinite { index: usize },
}

/// Apply every usable numeric entry of `values` through `apply(index, value)`.
///
/// Entries past `capacity`, symbols, and non-finite numbers are skipped.
/// Returns the skipped entries in order.
pub(crate) fn apply_sequence(
    values: &[ControlValue],
    capacity: usize,
    mut apply: impl FnMut(usize, f64),
) -> Vec<ControlError> {
    let mut rejected = Vec::new();

    for (index, value) in values.iter().enumerate() {
        let error = match value {
            ControlValue::Symbol(found) => Some(ControlError::WrongArgumentType {
                index,
                found: found.clone(),
            }),
            ControlValue::Float(_) if index >= capacity => {
                Some(ControlError::BandIndexOutOfRange { index, capacity })
            }
            ControlValue::Float(v) if !v.is_finite() => Some(ControlError::NonFinite { index }),
            ControlValue::Float(v) => {
                apply(index, f64::from(*v));
                None
            }
        };

        if let Some(error) = error {
            warn!("{}", error);
            rejected.push(error);
        }
    }

    rejected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sequence_skips_bad_entries() {
        let values = vec![
            ControlValue::from(1.0),
            ControlValue::from("bogus"),
            ControlValue::from(f32::NAN),
            ControlValue::from(3.0),
            ControlValue::from(4.0),
        ];
        let mut applied = Vec::new();
        let rejected = apply_sequence(&values, 4, |i, v| applied.push((i, v)));

        assert_eq!(applied, vec![(0, 1.0), (3, 3.0)]);
        assert_eq!(
            rejected,
            vec![
                ControlError::WrongArgumentType {
                    index: 1,
                    found: "bogus".to_string()
                },
                ControlError::NonFinite { index: 2 },
                ControlError::BandIndexOutOfRange {
                    index: 4,
                    capacity: 4
                },
            ]
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ControlError::WrongArgumentType {
            index: 2,
            found: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "Wrong argument type at index 2: foo");
        assert!(ControlError::InvalidMode(7).to_string().contains("7"));
    }
}
