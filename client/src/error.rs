//! Error taxonomy for the client.

use std::path::PathBuf;

/// Failures surfaced to callers.
///
/// Framing never appears here: incomplete or malformed stream data is
/// absorbed by the framer, which waits for more input instead of failing.
/// None of these are retried by this layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The analyzer executable could not be found.
    #[error("analyzer executable `{command}` not found")]
    NotFound {
        command: String,
        #[source]
        source: which::Error,
    },

    /// The analyzer executable was found but could not be launched.
    #[error("failed to launch analyzer `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A write was attempted on a session whose process already exited.
    #[error("cannot write to analyzer: session is stopped")]
    Write,

    /// The file path has no `file://` representation.
    #[error("cannot convert path to file URI: {}", .0.display())]
    InvalidPath(PathBuf),

    /// An outbound request failed to serialize.
    #[error("failed to encode request")]
    Encode(#[from] serde_json::Error),
}
