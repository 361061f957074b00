//! Pull-based leaf parser.

use std::io::{self, BufRead, BufReader, Read};

use tracing::{debug, trace};

use crate::source::{ByteSource, SourceError};
use crate::{Leaf, OwnedLeaf, ParseError, ParseErrorKind, ParseOptions};

/// Pull-based parser turning a byte stream into [`Leaf`] events.
///
/// The parser is a push-down automaton with a single byte of lookahead. It
/// keeps only the stack of currently open keys and the last value in
/// memory, so documents of any size can be streamed.
///
/// Errors are sticky: once [`next_leaf`](Parser::next_leaf) has failed, every
/// later call fails with the same error without reading further.
pub struct Parser<R> {
    source: ByteSource<R>,
    options: ParseOptions,
    state: State,
    path: Vec<Vec<u8>>,
    value: Vec<u8>,
    value_offset: u64,
    /// Root members started so far.
    members: usize,
    error: Option<ParseError>,
    /// Set once the `Iterator` impl has handed out the error.
    error_reported: bool,
}

/// Parser state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing read yet; expecting `{`.
    Start,
    /// Expecting a quoted key, its colon and a peek at what follows.
    Key,
    /// Expecting a quoted value.
    Value,
    /// Expecting `}`.
    CloseBracket,
    /// Expecting `,` between siblings.
    Comma,
    /// The root object was closed and the input is exhausted.
    Done,
}

/// Outcome of a single state transition.
enum Transition {
    /// Continue with the next state.
    Next(State),
    /// A value was read; hand it out, then continue with the next state.
    Yield(State),
}

impl<R: BufRead> Parser<R> {
    /// Create a parser reading from a buffered reader.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParseOptions::default())
    }

    /// Create a parser with explicit options.
    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Self {
            source: ByteSource::new(reader),
            options,
            state: State::Start,
            path: Vec::new(),
            value: Vec::new(),
            value_offset: 0,
            members: 0,
            error: None,
            error_reported: false,
        }
    }

    /// Advance to the next leaf.
    ///
    /// Returns `Ok(None)` once the root object has been closed and the input
    /// is exhausted.
    pub fn next_leaf(&mut self) -> Result<Option<Leaf<'_>>, ParseError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        loop {
            if self.state == State::Done {
                return Ok(None);
            }
            trace!(state = ?self.state, depth = self.path.len(), "step");
            match self.step(self.state) {
                Ok(Transition::Next(next)) => self.state = next,
                Ok(Transition::Yield(next)) => {
                    self.state = next;
                    return Ok(Some(Leaf {
                        path: &self.path,
                        value: &self.value,
                        member: self.members.saturating_sub(1),
                        offset: self.value_offset,
                    }));
                }
                Err(err) => {
                    debug!(%err, "parse failed");
                    self.error = Some(err.clone());
                    return Err(err);
                }
            }
        }
    }

    /// The options this parser was created with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Number of bytes consumed from the reader.
    pub fn position(&self) -> u64 {
        self.source.position()
    }

    /// Current nesting depth (number of open keys).
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Whether the whole document has been read successfully.
    pub fn is_finished(&self) -> bool {
        self.state == State::Done
    }

    /// The recorded error, if parsing failed.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        self.source.get_ref()
    }

    /// Consume the parser, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    fn step(&mut self, state: State) -> Result<Transition, ParseError> {
        match state {
            State::Start => self.read_start(),
            State::Key => self.read_key(),
            State::Value => self.read_value(),
            State::CloseBracket => self.read_close_bracket(),
            State::Comma => self.read_comma(),
            State::Done => Ok(Transition::Next(State::Done)),
        }
    }

    fn read_start(&mut self) -> Result<Transition, ParseError> {
        self.expect(b'{')?;
        if self.options.allow_empty_object && self.peek()? == b'}' {
            self.bump()?;
            debug!("empty document");
            return self.finish();
        }
        Ok(Transition::Next(State::Key))
    }

    fn read_key(&mut self) -> Result<Transition, ParseError> {
        if let Some(limit) = self.options.max_depth
            && self.path.len() >= limit
        {
            return Err(self.error_here(ParseErrorKind::DepthLimitExceeded { limit }));
        }

        self.expect(b'"')?;
        let mut key = Vec::new();
        self.source
            .read_quoted(&mut key)
            .map_err(|err| self.source_error(err))?;
        if self.path.is_empty() {
            self.members += 1;
        }
        self.path.push(key);

        self.expect(b':')?;
        match self.peek()? {
            b'{' => {
                self.bump()?;
                Ok(Transition::Next(State::Key))
            }
            b'"' => Ok(Transition::Next(State::Value)),
            found => Err(self.unexpected_here(found, b"{\"")),
        }
    }

    fn read_value(&mut self) -> Result<Transition, ParseError> {
        self.value_offset = self.source.position();
        self.expect(b'"')?;
        self.value.clear();
        self.source
            .read_quoted(&mut self.value)
            .map_err(|err| self.source_error(err))?;

        match self.peek()? {
            b'}' => Ok(Transition::Yield(State::CloseBracket)),
            b',' => Ok(Transition::Yield(State::Comma)),
            found => Err(self.unexpected_here(found, b"},")),
        }
    }

    fn read_close_bracket(&mut self) -> Result<Transition, ParseError> {
        self.expect(b'}')?;
        self.path.pop();
        if self.path.is_empty() {
            return self.finish();
        }
        match self.peek()? {
            b'}' => Ok(Transition::Next(State::CloseBracket)),
            b',' => Ok(Transition::Next(State::Comma)),
            found => Err(self.unexpected_here(found, b"},")),
        }
    }

    fn read_comma(&mut self) -> Result<Transition, ParseError> {
        self.path.pop();
        self.expect(b',')?;
        Ok(Transition::Next(State::Key))
    }

    /// The root object is closed; the reader must be exhausted.
    fn finish(&mut self) -> Result<Transition, ParseError> {
        let offset = self.source.position();
        match self.source.next() {
            Ok(None) => {
                debug!(bytes = offset, members = self.members, "document complete");
                Ok(Transition::Next(State::Done))
            }
            Ok(Some(found)) => Err(ParseError::new(
                ParseErrorKind::TrailingContent { found },
                offset,
            )),
            Err(err) => Err(self.io_error(err)),
        }
    }

    /// Consume one byte, which must be `want`.
    fn expect(&mut self, want: u8) -> Result<(), ParseError> {
        let offset = self.source.position();
        let found = self.bump()?;
        if found == want {
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::Unexpected {
                    found,
                    expected: expected_set(want),
                },
                offset,
            ))
        }
    }

    /// Consume one byte; end of input is an error.
    fn bump(&mut self) -> Result<u8, ParseError> {
        self.source.require().map_err(|err| self.source_error(err))
    }

    /// Peek at one byte; end of input is an error.
    fn peek(&mut self) -> Result<u8, ParseError> {
        match self.source.peek() {
            Ok(Some(byte)) => Ok(byte),
            Ok(None) => Err(self.error_here(ParseErrorKind::UnexpectedEof)),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn io_error(&self, err: io::Error) -> ParseError {
        self.error_here(err.into())
    }

    fn source_error(&self, err: SourceError) -> ParseError {
        match err {
            SourceError::Eof => self.error_here(ParseErrorKind::UnexpectedEof),
            SourceError::Io(err) => self.io_error(err),
        }
    }

    fn unexpected_here(&self, found: u8, expected: &'static [u8]) -> ParseError {
        self.error_here(ParseErrorKind::Unexpected { found, expected })
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.source.position())
    }
}

impl<R: Read> Parser<BufReader<R>> {
    /// Create a parser over an unbuffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Create a parser over an unbuffered reader with explicit options.
    pub fn from_reader_with_options(reader: R, options: ParseOptions) -> Self {
        let reader = BufReader::with_capacity(options.buffer_capacity.max(1), reader);
        Self::with_options(reader, options)
    }
}

impl<'a> Parser<&'a [u8]> {
    /// Create a parser over an in-memory document.
    pub fn from_slice(input: &'a [u8]) -> Self {
        Self::new(input)
    }
}

/// Yields owned leaves; the error is yielded once, then iteration stops.
impl<R: BufRead> Iterator for Parser<R> {
    type Item = Result<OwnedLeaf, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error_reported {
            return None;
        }
        let result = self.next_leaf().map(|leaf| leaf.map(Leaf::into_owned));
        match result {
            Ok(Some(leaf)) => Some(Ok(leaf)),
            Ok(None) => None,
            Err(err) => {
                self.error_reported = true;
                Some(Err(err))
            }
        }
    }
}

/// Single-byte sets for `expect`, as `'static` slices.
fn expected_set(want: u8) -> &'static [u8] {
    match want {
        b'{' => b"{",
        b'}' => b"}",
        b'"' => b"\"",
        b':' => b":",
        b',' => b",",
        _ => &[],
    }
}
