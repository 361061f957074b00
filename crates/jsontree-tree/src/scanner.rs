//! Member-by-member reading of multi-member documents.

use std::io::{BufRead, BufReader, Read};
use std::marker::PhantomData;

use jsontree_parse::{ParseOptions, Parser};
use tracing::trace;

use crate::builder::{BuildError, insert_leaf};
use crate::{Node, Value};

/// Iterator over the members of a document's root object, one [`Node`] each.
///
/// This reads what a writer without a parent key produces:
/// `{"a":{...},"b":{...}}` yields a node for `a`, then one for `b`. Only the
/// member being assembled is held in memory. `{}` yields nothing.
///
/// The first error ends the iteration.
pub struct Scanner<R, V> {
    parser: Parser<R>,
    /// Member currently being assembled, with its index.
    pending: Option<(usize, Node<V>)>,
    done: bool,
    _value: PhantomData<fn() -> V>,
}

impl<R: BufRead, V: Value> Scanner<R, V> {
    /// Create a scanner over a buffered reader.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParseOptions::default())
    }

    /// Create a scanner with explicit parser options.
    ///
    /// Empty documents are always accepted.
    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Self::from_parser(Parser::with_options(reader, options.allow_empty_object(true)))
    }

    fn from_parser(parser: Parser<R>) -> Self {
        Self {
            parser,
            pending: None,
            done: false,
            _value: PhantomData,
        }
    }

    /// Get a reference to the underlying parser.
    pub fn parser(&self) -> &Parser<R> {
        &self.parser
    }

    fn advance(&mut self) -> Result<Option<Node<V>>, BuildError> {
        loop {
            let Some(leaf) = self.parser.next_leaf()? else {
                return Ok(self.pending.take().map(|(_, node)| node));
            };
            let Some((member_key, rest)) = leaf.path().split_first() else {
                continue;
            };
            let member = leaf.member();

            if let Some((current, node)) = &mut self.pending
                && *current == member
            {
                insert_leaf(node, rest, &leaf)?;
                continue;
            }

            trace!(member, key = %String::from_utf8_lossy(member_key), "member started");
            let mut node = Node::new(member_key.as_slice());
            insert_leaf(&mut node, rest, &leaf)?;
            if let Some((_, finished)) = self.pending.replace((member, node)) {
                return Ok(Some(finished));
            }
        }
    }
}

impl<R: Read, V: Value> Scanner<BufReader<R>, V> {
    /// Create a scanner over an unbuffered reader.
    pub fn from_reader(reader: R) -> Self {
        let options = ParseOptions::default();
        let reader = BufReader::with_capacity(options.buffer_capacity, reader);
        Self::with_options(reader, options)
    }
}

impl<R: BufRead, V: Value> Iterator for Scanner<R, V> {
    type Item = Result<Node<V>, BuildError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(node)) => Some(Ok(node)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
