//! Parse errors.

use std::io;
use std::sync::Arc;

/// A parse error and the byte offset at which it was detected.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Byte offset into the input.
    pub offset: u64,
}

/// Parse error kinds.
#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    /// A byte other than the ones allowed at this point.
    Unexpected {
        /// The byte that was read.
        found: u8,
        /// The bytes that would have been accepted.
        expected: &'static [u8],
    },
    /// The reader reached end of input while the document was still open.
    UnexpectedEof,
    /// Bytes remain after the root object was closed.
    TrailingContent {
        /// The first byte after the root object.
        found: u8,
    },
    /// The document nests deeper than [`ParseOptions::max_depth`](crate::ParseOptions::max_depth).
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// The reader failed.
    Io(Arc<io::Error>),
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, offset: u64) -> Self {
        Self { kind, offset }
    }

    /// The underlying reader error, if this error came from the reader.
    pub fn io_error(&self) -> Option<&io::Error> {
        match &self.kind {
            ParseErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the input ended before the document was complete.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnexpectedEof)
    }
}

/// Reader errors are kept as they are, whatever their kind. Only the reader
/// running dry produces [`ParseErrorKind::UnexpectedEof`].
impl From<io::Error> for ParseErrorKind {
    fn from(err: io::Error) -> Self {
        ParseErrorKind::Io(Arc::new(err))
    }
}

impl PartialEq for ParseErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ParseErrorKind::Unexpected { found, expected },
                ParseErrorKind::Unexpected {
                    found: other_found,
                    expected: other_expected,
                },
            ) => found == other_found && expected == other_expected,
            (ParseErrorKind::UnexpectedEof, ParseErrorKind::UnexpectedEof) => true,
            (
                ParseErrorKind::TrailingContent { found },
                ParseErrorKind::TrailingContent { found: other },
            ) => found == other,
            (
                ParseErrorKind::DepthLimitExceeded { limit },
                ParseErrorKind::DepthLimitExceeded { limit: other },
            ) => limit == other,
            // io::Error has no equality; compare what can be observed.
            (ParseErrorKind::Io(a), ParseErrorKind::Io(b)) => {
                Arc::ptr_eq(a, b) || (a.kind() == b.kind() && a.to_string() == b.to_string())
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::Unexpected { found, expected } => {
                write!(f, "read '{}', expected ", Byte(*found))?;
                for (i, byte) in expected.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "'{}'", Byte(*byte))?;
                }
                Ok(())
            }
            ParseErrorKind::UnexpectedEof => {
                write!(f, "reader returned end of input before expected")
            }
            ParseErrorKind::TrailingContent { found } => {
                write!(f, "expected end of input, found '{}'", Byte(*found))
            }
            ParseErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting depth exceeds the limit of {limit}")
            }
            ParseErrorKind::Io(err) => write!(f, "read failed: {err}"),
        }
    }
}

/// Printable ASCII as is, anything else escaped.
struct Byte(u8);

impl std::fmt::Display for Byte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == b' ' || self.0.is_ascii_graphic() {
            write!(f, "{}", char::from(self.0))
        } else {
            write!(f, "{}", self.0.escape_ascii())
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
