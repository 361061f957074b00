//! Whole-tree serializer.

use std::io::Write;

use jsontree_tree::{Tree, TreeNode, Value};
use tracing::debug;

use crate::{NodeShape, WriteError};

/// Serialize `root` as a complete document.
///
/// The root becomes the single member of the document object. Keys and leaf
/// bytes are written verbatim; nothing is escaped. The sink is flushed once
/// the document is complete.
pub fn to_writer<N, W>(root: &N, mut writer: W) -> Result<(), WriteError>
where
    N: TreeNode + ?Sized,
    W: Write,
{
    writer.write_all(b"{")?;
    write_member(root, &mut writer)?;
    writer.write_all(b"}")?;
    writer.flush()?;
    debug!(key = %String::from_utf8_lossy(root.key()), "document serialized");
    Ok(())
}

/// Serialize `root` into a new buffer.
pub fn to_vec<N: TreeNode + ?Sized>(root: &N) -> Result<Vec<u8>, WriteError> {
    let mut out = Vec::new();
    to_writer(root, &mut out)?;
    Ok(out)
}

/// Serialize a tree, failing with [`WriteError::MissingRoot`] if it is empty.
pub fn write_tree<V: Value, W: Write>(tree: &Tree<V>, writer: W) -> Result<(), WriteError> {
    let root = tree.root().ok_or(WriteError::MissingRoot)?;
    to_writer(root, writer)
}

/// Write `"key":` followed by the node's value or its children, without
/// braces around the member itself.
pub(crate) fn write_member<N, W>(node: &N, out: &mut W) -> Result<(), WriteError>
where
    N: TreeNode + ?Sized,
    W: Write + ?Sized,
{
    let count = node.child_count();
    let shape = match (count, node.value()) {
        (0, None) => Some(NodeShape::Empty),
        (1.., Some(_)) => Some(NodeShape::Ambiguous),
        _ => None,
    };
    if let Some(shape) = shape {
        return Err(WriteError::InvalidNode {
            key: node.key().to_vec(),
            shape,
        });
    }

    if let Some(value) = node.value() {
        let bytes = value
            .serialize()
            .map_err(|err| WriteError::Value(Box::new(err)))?;
        write_key(node.key(), out)?;
        out.write_all(b"\"")?;
        out.write_all(&bytes)?;
        out.write_all(b"\"")?;
        return Ok(());
    }

    write_key(node.key(), out)?;
    out.write_all(b"{")?;
    for index in 0..count {
        if index > 0 {
            out.write_all(b",")?;
        }
        let child = node
            .child_at(index)
            .ok_or_else(|| WriteError::MissingChild {
                key: node.key().to_vec(),
                index,
            })?;
        write_member(child, out)?;
    }
    out.write_all(b"}")?;
    Ok(())
}

fn write_key<W: Write + ?Sized>(key: &[u8], out: &mut W) -> Result<(), WriteError> {
    out.write_all(b"\"")?;
    out.write_all(key)?;
    out.write_all(b"\":")?;
    Ok(())
}
