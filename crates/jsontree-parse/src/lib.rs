#![doc = include_str!("../README.md")]

mod error;
pub use error::{ParseError, ParseErrorKind};

mod leaf;
pub use leaf::{Leaf, OwnedLeaf};

mod options;
pub use options::ParseOptions;

mod source;

mod parser;
pub use parser::Parser;
