//! Error types for the binding layer.
//!
//! Every host-facing operation returns [`Result`]; misuse and unknown input
//! are reported as values, never as panics.

use std::fmt;

use cxtree_frontend::NodeClass;
use thiserror::Error;

use crate::{Accessor, KindSet, NodeKind, UnitKey};

/// Why an opaque cursor was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    /// The null cursor.
    Null,
    /// The cursor was produced by a different index.
    ForeignIndex,
    /// The cursor's unit has been disposed.
    Disposed,
    /// The node address is not aligned for a node header.
    Misaligned,
    /// The node address is not a node of the cursor's unit.
    NotInUnit,
    /// The cursor's class disagrees with the node's dynamic class.
    ClassMismatch,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null cursor",
            Self::ForeignIndex => "cursor belongs to another index",
            Self::Disposed => "translation unit was disposed",
            Self::Misaligned => "misaligned node address",
            Self::NotInUnit => "address is not a node of the unit",
            Self::ClassMismatch => "cursor class does not match the node",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum BindingError {
    #[error("invalid cursor: {reason}")]
    InvalidCursor { reason: InvalidReason },

    #[error("translation unit {unit} has been disposed")]
    UseAfterDispose { unit: UnitKey },

    #[error("`{accessor}` is not supported on {kind}; supported on {expected}")]
    UnsupportedOperation { accessor: Accessor, kind: NodeKind, expected: KindSet },

    #[error("no wrapper registered for node class `{class}`")]
    UnknownKind { class: NodeClass },
}

pub type Result<T, E = BindingError> = std::result::Result<T, E>;
