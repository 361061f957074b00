#![doc = include_str!("../README.md")]

pub use jsontree_format::{NodeShape, TreeWriter, WriteError, to_vec, to_writer, write_tree};
pub use jsontree_parse::{Leaf, OwnedLeaf, ParseError, ParseErrorKind, ParseOptions, Parser};
pub use jsontree_tree::{
    BuildError, Node, Scanner, Tree, TreeBuilder, TreeNode, Value, from_parser, from_reader,
    from_slice, render_parse_error,
};
