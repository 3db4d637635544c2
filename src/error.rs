//! Error types for the telemetry bridge.
//!
//! The taxonomy mirrors the lifecycle of a session:
//!
//! - [`TelemetryError::SegmentUnavailable`] — the simulator has not created the
//!   shared-memory segment yet. Retryable; the waiting loop polls until it appears.
//! - [`TelemetryError::SegmentLost`] — the segment became inaccessible (or a read
//!   ran past its end) after streaming began. Fatal to the session: the loop stops
//!   cleanly rather than sending stale telemetry under a new session's identity.
//! - [`TelemetryError::Cancelled`] — the user interrupted the program. Takes the
//!   same teardown path as `SegmentLost` but is reported as a normal close.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for the telemetry bridge.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("shared memory segment '{name}' is not available")]
    SegmentUnavailable {
        name: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("telemetry segment lost: {context}")]
    SegmentLost { context: String, offset: Option<usize> },

    #[error("session cancelled")]
    Cancelled,

    #[error("configuration error in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("network error during {operation}")]
    Network {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{feature} is only available on {required_platform}")]
    UnsupportedPlatform { feature: String, required_platform: String },

    #[error("Windows API error: {operation}")]
    #[cfg(windows)]
    WindowsApi {
        operation: String,
        #[source]
        source: windows_core::Error,
    },
}

impl TelemetryError {
    /// Returns whether this error is recoverable by retrying.
    ///
    /// Only the pre-session condition is: a missing segment means the simulator
    /// has not started yet. Everything after the session begins is terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TelemetryError::SegmentUnavailable { .. })
    }

    /// Returns whether this error represents a cooperative user cancellation
    /// rather than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TelemetryError::Cancelled)
    }

    /// Helper constructor for a segment that does not exist yet.
    pub fn segment_unavailable(name: impl Into<String>) -> Self {
        TelemetryError::SegmentUnavailable { name: name.into(), source: None }
    }

    /// Helper constructor for a missing segment with an underlying cause.
    pub fn segment_unavailable_with_source(
        name: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::SegmentUnavailable { name: name.into(), source: Some(source) }
    }

    /// Helper constructor for a segment lost mid-session.
    pub fn segment_lost(context: impl Into<String>) -> Self {
        TelemetryError::SegmentLost { context: context.into(), offset: None }
    }

    /// Helper constructor for a read that ran past the end of the segment.
    ///
    /// A short read cannot be distinguished from a segment being torn down, so
    /// it is classified as the segment-lost condition rather than zero-filled.
    pub fn short_read(offset: usize, len: usize, available: usize) -> Self {
        TelemetryError::SegmentLost {
            context: format!(
                "read of {len} bytes at offset {offset} exceeds {available}-byte segment"
            ),
            offset: Some(offset),
        }
    }

    /// Helper constructor for configuration errors.
    pub fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TelemetryError::Config { path: path.into(), reason: reason.to_string() }
    }

    /// Helper constructor for socket setup failures.
    pub fn network(operation: impl Into<String>, source: std::io::Error) -> Self {
        TelemetryError::Network { operation: operation.into(), source }
    }

    /// Helper constructor for unsupported platform errors.
    pub fn unsupported_platform(
        feature: impl Into<String>,
        required_platform: impl Into<String>,
    ) -> Self {
        TelemetryError::UnsupportedPlatform {
            feature: feature.into(),
            required_platform: required_platform.into(),
        }
    }

    /// Helper constructor for Windows API errors.
    #[cfg(windows)]
    pub fn windows_api(operation: impl Into<String>, source: windows_core::Error) -> Self {
        TelemetryError::WindowsApi { operation: operation.into(), source }
    }
}
