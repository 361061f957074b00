//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::io::{self, Read, Write};

use jsontree::Node;

pub const IO_ERROR: &str = "injected test error";

/// Reader that hands out `data` and fails once `limit` bytes were read.
pub struct FailingReader<'a> {
    data: &'a [u8],
    limit: usize,
}

impl<'a> FailingReader<'a> {
    pub fn new(data: &'a [u8], limit: usize) -> Self {
        Self { data, limit }
    }
}

impl Read for FailingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.limit == 0 {
            return Err(io::Error::other(IO_ERROR));
        }
        let n = buf.len().min(self.data.len()).min(self.limit);
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        self.limit -= n;
        Ok(n)
    }
}

/// Writer that accepts `limit` bytes, then fails.
pub struct FailingWriter {
    pub written: Vec<u8>,
    limit: usize,
}

impl FailingWriter {
    pub fn new(limit: usize) -> Self {
        Self {
            written: Vec::new(),
            limit,
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit - self.written.len();
        if room == 0 {
            return Err(io::Error::other(IO_ERROR));
        }
        let n = buf.len().min(room);
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn leaf(key: &str, value: &str) -> Node<String> {
    Node::leaf(key, value.to_string())
}

/// `{"a":{"b":"v1","c":{"d":"v2","e":"v3"}},"f":{"g":"v4"},"h":{"i":{"j":"v5"}}}`
/// as separate top-level nodes.
pub fn members() -> Vec<Node<String>> {
    vec![
        Node::branch(
            "a",
            [leaf("b", "v1"), Node::branch("c", [leaf("d", "v2"), leaf("e", "v3")])],
        ),
        Node::branch("f", [leaf("g", "v4")]),
        Node::branch("h", [Node::branch("i", [leaf("j", "v5")])]),
    ]
}
