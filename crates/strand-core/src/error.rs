//! Error types for the Strand framework.

use std::fmt;

/// Errors that can occur while bringing a Strand plugin up.
///
/// Processing itself never fails: once an instance exists, every problem
/// inside a block degrades silently (see [`EventSink`](crate::EventSink)).
#[derive(Debug)]
pub enum PluginError {
    /// Plugin initialization failed.
    InitializationFailed(String),
    /// The host did not provide a feature the plugin requires.
    MissingHostFeature(&'static str),
    /// The host's URID map returned no identifier for a URI.
    UnmappedUri(&'static str),
    /// The host asked for a sample rate outside the supported range.
    InvalidSampleRate(f64),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Self::MissingHostFeature(uri) => write!(f, "Host does not support {}", uri),
            Self::UnmappedUri(uri) => write!(f, "Host could not map URI {}", uri),
            Self::InvalidSampleRate(rate) => write!(f, "Invalid sample rate: {}", rate),
        }
    }
}

impl std::error::Error for PluginError {}

/// Result type for Strand operations.
pub type PluginResult<T> = Result<T, PluginError>;
