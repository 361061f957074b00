//! Errors produced while writing documents.

use std::io;

/// Why a node cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// The node has neither children nor a value.
    Empty,
    /// The node has both children and a value.
    Ambiguous,
}

/// Error during serialization or incremental writing.
#[derive(Debug)]
pub enum WriteError {
    /// The tree has no root node.
    MissingRoot,
    /// A node breaks the children-xor-value rule.
    InvalidNode {
        /// Raw key of the offending node.
        key: Vec<u8>,
        /// What is wrong with it.
        shape: NodeShape,
    },
    /// A child slot below the node's child count is empty.
    MissingChild {
        /// Raw key of the parent node.
        key: Vec<u8>,
        /// Index of the empty slot.
        index: usize,
    },
    /// The sink failed.
    Io(io::Error),
    /// The leaf codec failed to serialize a value.
    Value(Box<dyn std::error::Error + Send + Sync>),
    /// `write_parent` was already called.
    ParentAlreadyWritten,
    /// `write_parent` was called after a node was written.
    ParentAfterNodes,
    /// The writer was closed.
    Closed,
    /// `close` was called before any node was written.
    NoNodes,
    /// An earlier call failed; the output is incomplete.
    Poisoned,
}

impl WriteError {
    /// Whether this error leaves the writer unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WriteError::InvalidNode { .. }
                | WriteError::MissingChild { .. }
                | WriteError::Io(_)
                | WriteError::Value(_)
                | WriteError::Poisoned
        )
    }
}

impl From<io::Error> for WriteError {
    fn from(err: io::Error) -> Self {
        WriteError::Io(err)
    }
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::MissingRoot => write!(f, "node is nil"),
            WriteError::InvalidNode { key, shape } => {
                let key = String::from_utf8_lossy(key);
                match shape {
                    NodeShape::Empty => {
                        write!(f, "node `{key}` has neither children nor a value")
                    }
                    NodeShape::Ambiguous => {
                        write!(f, "node `{key}` has both children and a value")
                    }
                }
            }
            WriteError::MissingChild { key, index } => write!(
                f,
                "node `{}` is missing child {index}",
                String::from_utf8_lossy(key)
            ),
            WriteError::Io(err) => write!(f, "write failed: {err}"),
            WriteError::Value(err) => write!(f, "cannot serialize leaf value: {err}"),
            WriteError::ParentAlreadyWritten => write!(f, "parent key already written"),
            WriteError::ParentAfterNodes => {
                write!(f, "parent key must be written before any node")
            }
            WriteError::Closed => write!(f, "writer is closed"),
            WriteError::NoNodes => write!(f, "must write at least one node before closing"),
            WriteError::Poisoned => write!(f, "writer failed earlier and cannot continue"),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Io(err) => Some(err),
            WriteError::Value(err) => Some(&**err),
            _ => None,
        }
    }
}
