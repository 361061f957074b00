//! Incremental document writer.

use std::io::Write;

use jsontree_tree::TreeNode;
use tracing::{debug, trace};

use crate::WriteError;
use crate::serializer::write_member;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    ParentWritten,
    NodesStarted { parent: bool },
    Closed,
    Failed,
}

/// Writer that emits a document one top-level node at a time.
///
/// Without a parent key, every node becomes a member of the document
/// object: `{"a":...,"b":...}`. With [`write_parent`](TreeWriter::write_parent)
/// the nodes become the children of that key, and the output is byte-for-byte
/// what the serializer produces for the equivalent tree.
///
/// [`close`](TreeWriter::close) must be called to finish the document;
/// dropping the writer leaves the output truncated. A failed write or an
/// invalid node poisons the writer.
pub struct TreeWriter<W: Write> {
    sink: W,
    state: State,
    nodes: usize,
}

impl<W: Write> TreeWriter<W> {
    /// Create a writer over a sink. Nothing is written until the first call.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: State::Fresh,
            nodes: 0,
        }
    }

    /// Write the parent key that the following nodes are nested under.
    ///
    /// Only allowed before anything else was written. A rejected call writes
    /// nothing and leaves the writer as it was.
    pub fn write_parent(&mut self, key: &[u8]) -> Result<(), WriteError> {
        match self.state {
            State::Fresh => {}
            State::ParentWritten => return Err(WriteError::ParentAlreadyWritten),
            State::NodesStarted { .. } => return Err(WriteError::ParentAfterNodes),
            State::Closed => return Err(WriteError::Closed),
            State::Failed => return Err(WriteError::Poisoned),
        }
        trace!(key = %String::from_utf8_lossy(key), "write parent");
        let result = self
            .sink
            .write_all(b"{\"")
            .and_then(|()| self.sink.write_all(key))
            .and_then(|()| self.sink.write_all(b"\":"));
        self.settle(result.map_err(WriteError::from), State::ParentWritten)
    }

    /// Write the next top-level node.
    pub fn write_node<N: TreeNode + ?Sized>(&mut self, node: &N) -> Result<(), WriteError> {
        let (separator, parent) = match self.state {
            State::Fresh => (b"{", false),
            State::ParentWritten => (b"{", true),
            State::NodesStarted { parent } => (b",", parent),
            State::Closed => return Err(WriteError::Closed),
            State::Failed => return Err(WriteError::Poisoned),
        };
        trace!(key = %String::from_utf8_lossy(node.key()), index = self.nodes, "write node");
        let result = match self.sink.write_all(separator) {
            Ok(()) => write_member(node, &mut self.sink),
            Err(err) => Err(err.into()),
        };
        self.settle(result, State::NodesStarted { parent })?;
        self.nodes += 1;
        Ok(())
    }

    /// Finish the document and flush the sink.
    ///
    /// Closing twice is a no-op. Closing before any node was written fails
    /// with [`WriteError::NoNodes`] and leaves the writer open.
    pub fn close(&mut self) -> Result<(), WriteError> {
        let closing: &[u8] = match self.state {
            State::Closed => return Ok(()),
            State::Failed => return Err(WriteError::Poisoned),
            State::Fresh | State::ParentWritten => return Err(WriteError::NoNodes),
            State::NodesStarted { parent: false } => b"}",
            State::NodesStarted { parent: true } => b"}}",
        };
        let result = self
            .sink
            .write_all(closing)
            .and_then(|()| self.sink.flush());
        self.settle(result.map_err(WriteError::from), State::Closed)?;
        debug!(nodes = self.nodes, "document closed");
        Ok(())
    }

    /// Whether [`close`](TreeWriter::close) has completed.
    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Number of nodes written so far.
    pub fn nodes_written(&self) -> usize {
        self.nodes
    }

    /// Get a reference to the sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consume the writer, returning the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Move to `next` on success, or to the failed state.
    fn settle(&mut self, result: Result<(), WriteError>, next: State) -> Result<(), WriteError> {
        match result {
            Ok(()) => {
                self.state = next;
                Ok(())
            }
            Err(err) => {
                debug!(%err, "writer poisoned");
                self.state = State::Failed;
                Err(err)
            }
        }
    }
}
