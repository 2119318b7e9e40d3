//! Errors raised while assembling a command.

use thiserror::Error;

/// Caller contract violations detected while building a command.
///
/// These are programming errors rather than runtime conditions: retrying the
/// same call cannot succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A parameter required by the action was not supplied.
    #[error("missing required parameter '{0}'")]
    MissingParam(String),
    /// A `key=value` pair could not be split.
    #[error("malformed parameter '{0}': expected key=value")]
    MalformedPair(String),
}
