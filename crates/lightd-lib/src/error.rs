//! Unified error type for the lightd-lib crate.
//!
//! [`LightdError`] wraps the sink layer's [`SinkError`] and the domain error
//! kinds (`Config`, `Color`, `Parse`). `From` impls allow `?` to propagate
//! across module boundaries.

use std::fmt;

use crate::sink::SinkError;

/// Unified error type for lightd-lib operations.
#[derive(Debug)]
pub enum LightdError {
    /// LED sink error (probe, read, write).
    Sink(SinkError),
    /// Standard I/O error (config persistence, stdin).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
    /// Request or name parsing error.
    Parse(String),
}

impl fmt::Display for LightdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightdError::Sink(e) => write!(f, "{e}"),
            LightdError::Io(e) => write!(f, "I/O error: {e}"),
            LightdError::Config(e) => write!(f, "Config error: {e}"),
            LightdError::Color(e) => write!(f, "Color error: {e}"),
            LightdError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for LightdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LightdError::Sink(e) => Some(e),
            LightdError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SinkError> for LightdError {
    fn from(e: SinkError) -> Self {
        LightdError::Sink(e)
    }
}

impl From<std::io::Error> for LightdError {
    fn from(e: std::io::Error) -> Self {
        LightdError::Io(e)
    }
}

/// Crate-level Result alias using [`LightdError`].
pub type Result<T> = std::result::Result<T, LightdError>;
