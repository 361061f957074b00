//! Tree builder from parser leaves.

use jsontree_parse::{Leaf, ParseError};
use tracing::debug;

use crate::{Node, Tree, Value};

/// Error during tree building.
#[derive(Debug)]
pub enum BuildError {
    /// The document is not well-formed.
    Parse(ParseError),
    /// The root object has more than one member.
    MultipleRoots {
        /// Offset of the first value inside the extra member.
        offset: u64,
    },
    /// A leaf path repeats, or descends into an existing leaf.
    PathConflict {
        /// Full path of the offending leaf, root key first.
        path: Vec<Vec<u8>>,
        /// Offset of the offending value.
        offset: u64,
    },
    /// The leaf codec rejected a value.
    Value(Box<dyn std::error::Error + Send + Sync>),
    /// No leaf was ever pushed.
    EmptyDocument,
}

impl BuildError {
    /// Byte offset the error points at, if it has one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            BuildError::Parse(err) => Some(err.offset),
            BuildError::MultipleRoots { offset } | BuildError::PathConflict { offset, .. } => {
                Some(*offset)
            }
            BuildError::Value(_) | BuildError::EmptyDocument => None,
        }
    }
}

impl From<ParseError> for BuildError {
    fn from(err: ParseError) -> Self {
        BuildError::Parse(err)
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Parse(err) => write!(f, "{err}"),
            BuildError::MultipleRoots { offset } => {
                write!(f, "expected exactly one root node, found another at offset {offset}")
            }
            BuildError::PathConflict { path, offset } => {
                write!(f, "conflicting value for `{}` at offset {offset}", join_path(path))
            }
            BuildError::Value(err) => write!(f, "invalid leaf value: {err}"),
            BuildError::EmptyDocument => write!(f, "empty document"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Parse(err) => Some(err),
            BuildError::Value(err) => Some(&**err),
            _ => None,
        }
    }
}

pub(crate) fn join_path(path: &[Vec<u8>]) -> String {
    path.iter()
        .map(|key| String::from_utf8_lossy(key))
        .collect::<Vec<_>>()
        .join(".")
}

/// Builder that assembles a single-root tree from parser leaves.
///
/// The first leaf fixes the root key. Leaves belonging to a second root
/// member are rejected, as are leaves whose path was already assigned or
/// passes through an existing leaf.
pub struct TreeBuilder<V> {
    root: Option<Node<V>>,
}

impl<V: Value> TreeBuilder<V> {
    /// Create a new tree builder.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Add one leaf to the tree.
    pub fn push(&mut self, leaf: Leaf<'_>) -> Result<(), BuildError> {
        let Some((root_key, rest)) = leaf.path().split_first() else {
            return Ok(());
        };
        if leaf.member() > 0 {
            return Err(BuildError::MultipleRoots {
                offset: leaf.offset(),
            });
        }
        let root = self.root.get_or_insert_with(|| {
            debug!(key = %String::from_utf8_lossy(root_key), "root key established");
            Node::new(root_key.as_slice())
        });
        insert_leaf(root, rest, &leaf)
    }

    /// Finish building and return the root node.
    pub fn finish(self) -> Result<Node<V>, BuildError> {
        self.root.ok_or(BuildError::EmptyDocument)
    }

    /// Finish building, allowing an empty result.
    pub fn into_tree(self) -> Tree<V> {
        match self.root {
            Some(root) => Tree::from(root),
            None => Tree::new(),
        }
    }
}

impl<V: Value> Default for TreeBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode the leaf's value and store it at `rest`, relative to `node`.
pub(crate) fn insert_leaf<V: Value>(
    node: &mut Node<V>,
    rest: &[Vec<u8>],
    leaf: &Leaf<'_>,
) -> Result<(), BuildError> {
    if conflicts(node, rest) {
        return Err(BuildError::PathConflict {
            path: leaf.path().to_vec(),
            offset: leaf.offset(),
        });
    }
    let value = V::deserialize(leaf.value()).map_err(|err| BuildError::Value(Box::new(err)))?;
    node.descendant_or_insert(rest).value = Some(value);
    Ok(())
}

/// Whether `rest` passes through a leaf, or ends at a node that already has
/// a value or children.
fn conflicts<V>(node: &Node<V>, rest: &[Vec<u8>]) -> bool {
    let mut current = node;
    for key in rest {
        if current.value.is_some() {
            return true;
        }
        match current.child(key) {
            Some(child) => current = child,
            None => return false,
        }
    }
    !current.is_empty()
}
