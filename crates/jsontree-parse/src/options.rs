//! Parser configuration.

/// Options for a [`Parser`](crate::Parser).
///
/// Options are fixed when the parser is created.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum nesting depth, counted in keys (default: unlimited).
    ///
    /// A document nesting deeper fails with
    /// [`ParseErrorKind::DepthLimitExceeded`](crate::ParseErrorKind::DepthLimitExceeded).
    pub max_depth: Option<usize>,

    /// Accept `{}` as a document without members (default: false).
    pub allow_empty_object: bool,

    /// Buffer size used when wrapping an unbuffered reader (default: 8 KiB).
    ///
    /// A capacity of zero is treated as one byte.
    pub buffer_capacity: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            allow_empty_object: false,
            buffer_capacity: 8 * 1024,
        }
    }
}

impl ParseOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Accept or reject `{}` as a document.
    pub fn allow_empty_object(mut self, allow: bool) -> Self {
        self.allow_empty_object = allow;
        self
    }

    /// Set the read buffer size used by `Parser::from_reader`.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }
}
