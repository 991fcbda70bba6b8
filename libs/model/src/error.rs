//! Error types for decoding, validating, and transitioning records.

use thiserror::Error;
use validator::ValidationErrors;

/// Errors that can occur when handling model records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The payload could not be decoded into the expected shape.
    #[error("malformed payload: {0}")]
    Decode(String),

    /// A decoded record violates an invariant.
    #[error("inconsistent {record}: {message}")]
    Inconsistent {
        record: &'static str,
        message: String,
    },

    /// A create form failed validation.
    #[error("invalid event: {0}")]
    Invalid(#[from] ValidationErrors),

    /// The selected date is not one of the event's proposed dates.
    #[error("selected date {0} is not one of the proposed dates")]
    DateNotProposed(String),

    /// A rejection was submitted without remarks.
    #[error("remarks are required to reject an event")]
    RemarksRequired,
}

impl ModelError {
    pub(crate) fn inconsistent(record: &'static str, message: impl Into<String>) -> Self {
        Self::Inconsistent {
            record,
            message: message.into(),
        }
    }

    /// Flatten validation failures into `(field, message)` pairs, sorted by field.
    ///
    /// Errors that are not validation failures yield an empty list.
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let ModelError::Invalid(errors) = self else {
            return Vec::new();
        };

        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();
        fields.sort();
        fields
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Decode(err.to_string())
    }
}
