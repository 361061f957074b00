#![doc = include_str!("../README.md")]
//! Document tree representation for jsontree documents.
//!
//! This crate provides the [`Node`] tree, the [`Value`] trait for leaf
//! payloads, a [`TreeBuilder`] fed by parser leaves and a member-by-member
//! [`Scanner`].

use std::io::{BufRead, Read};

use jsontree_parse::Parser;

mod builder;
mod diagnostic;
mod node;
mod scanner;
mod value;

pub use builder::{BuildError, TreeBuilder};
pub use diagnostic::render_parse_error;
pub use jsontree_parse::{Leaf, ParseError, ParseErrorKind, ParseOptions};
pub use node::{Node, Tree, TreeNode};
pub use scanner::Scanner;
pub use value::Value;

/// Build a tree from every leaf the parser yields.
pub fn from_parser<R: BufRead, V: Value>(parser: &mut Parser<R>) -> Result<Node<V>, BuildError> {
    let mut builder = TreeBuilder::new();
    while let Some(leaf) = parser.next_leaf()? {
        builder.push(leaf)?;
    }
    builder.finish()
}

/// Parse a document from a reader.
pub fn from_reader<R: Read, V: Value>(reader: R) -> Result<Node<V>, BuildError> {
    from_parser(&mut Parser::from_reader(reader))
}

/// Parse a document from bytes.
pub fn from_slice<V: Value>(input: &[u8]) -> Result<Node<V>, BuildError> {
    from_parser(&mut Parser::from_slice(input))
}
