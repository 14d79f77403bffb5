//! Error type for parameter validation

use thiserror::Error;

/// A rejected parameter value
///
/// Every fallible operation in this crate fails for the same reason: a
/// caller-supplied parameter violated its documented constraint. The error
/// carries the parameter name, the offending value and the constraint, so
/// the rendered message is actionable on its own.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid parameter: {param} = {value} ({constraint})")]
pub struct InvalidParameterError {
    /// Name of the rejected parameter
    pub param: &'static str,
    /// The offending value, rendered for display
    pub value: String,
    /// The constraint the value violated
    pub constraint: &'static str,
}

impl InvalidParameterError {
    pub(crate) fn new(
        param: &'static str,
        value: impl ToString,
        constraint: &'static str,
    ) -> Self {
        Self {
            param,
            value: value.to_string(),
            constraint,
        }
    }
}
