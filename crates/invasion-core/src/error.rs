//! Error Types
//!
//! Every failure the invasion can report, grouped into a small set of kinds.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::world::Direction;

/// Category of an [`InvasionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidLocation,
    InvalidDirection,
    InvalidFileName,
    InvalidAgentCount,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::InvalidLocation => "invalid location",
            ErrorKind::InvalidDirection => "invalid direction",
            ErrorKind::InvalidFileName => "invalid filename",
            ErrorKind::InvalidAgentCount => "invalid agent count",
            ErrorKind::Io => "io error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum InvasionError {
    #[error("invalid location : isolated location ({location})")]
    IsolatedLocation { location: String },

    #[error("invalid location : duplicate location ({location})")]
    DuplicateLocation { location: String },

    #[error("invalid location : nothing to invade, the map has no locations")]
    EmptyMap,

    #[error("invalid direction : cannot parse direction entry ({entry}) of ({location})")]
    MalformedEntry { location: String, entry: String },

    #[error("invalid direction : unknown direction ({direction}) of ({location})")]
    UnknownDirection { location: String, direction: String },

    #[error("invalid direction : location ({location}) cannot direct to itself")]
    SelfLoop { location: String },

    #[error("invalid direction : ambiguous {direction} direction from ({from}) to ({to})")]
    AmbiguousDirection {
        from: String,
        to: String,
        direction: Direction,
    },

    #[error("invalid filename : ({})", .path.display())]
    InvalidFileName { path: PathBuf },

    #[error("invalid agent count : ({count}), at least one agent is required")]
    InvalidAgentCount { count: u32 },

    #[error("io error : cannot read ({})", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A parse failure, tagged with the 1-based line it happened on.
    /// The inner error is part of the message, not a separate cause.
    #[error("{error} on line {line}")]
    AtLine {
        line: usize,
        error: Box<InvasionError>,
    },
}

impl InvasionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvasionError::IsolatedLocation { .. }
            | InvasionError::DuplicateLocation { .. }
            | InvasionError::EmptyMap => ErrorKind::InvalidLocation,
            InvasionError::MalformedEntry { .. }
            | InvasionError::UnknownDirection { .. }
            | InvasionError::SelfLoop { .. }
            | InvasionError::AmbiguousDirection { .. } => ErrorKind::InvalidDirection,
            InvasionError::InvalidFileName { .. } => ErrorKind::InvalidFileName,
            InvasionError::InvalidAgentCount { .. } => ErrorKind::InvalidAgentCount,
            InvasionError::Io { .. } => ErrorKind::Io,
            InvasionError::AtLine { error, .. } => error.kind(),
        }
    }

    /// The error with any line tagging stripped off
    pub fn root(&self) -> &InvasionError {
        match self {
            InvasionError::AtLine { error, .. } => error.root(),
            other => other,
        }
    }

    pub(crate) fn at_line(self, line: usize) -> Self {
        InvasionError::AtLine {
            line,
            error: Box::new(self),
        }
    }
}
