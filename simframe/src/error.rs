//! Error types for frame assembly and spatial queries.

use thiserror::Error;

/// Errors that can occur while assembling or querying frames.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    /// The frame topology is malformed (missing parent, cycle, duplicate name...).
    #[error("structural configuration error in frame '{frame}': {reason}")]
    StructuralConfiguration {
        /// Name of the offending frame.
        frame: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The state does not belong to the model being queried.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A transform that should be rigid is not.
    #[error("numerical degeneracy in frame '{frame}': {reason}")]
    NumericalDegeneracy {
        /// Name of the frame whose transform is degenerate.
        frame: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No frame with the given id or name exists in the tree.
    #[error("unknown frame: {0}")]
    UnknownFrame(String),

    /// A pairwise query mixed frames from two different trees.
    #[error("frames belong to different models")]
    ForeignFrame,

    /// Invalid tree configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FrameError {
    /// Creates a structural configuration error.
    #[must_use]
    pub fn structural(frame: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StructuralConfiguration {
            frame: frame.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid state error.
    #[must_use]
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    /// Creates a numerical degeneracy error.
    #[must_use]
    pub fn degenerate(frame: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NumericalDegeneracy {
            frame: frame.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown frame error.
    #[must_use]
    pub fn unknown_frame(what: impl Into<String>) -> Self {
        Self::UnknownFrame(what.into())
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Result type for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;
