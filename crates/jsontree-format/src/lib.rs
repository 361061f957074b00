#![doc = include_str!("../README.md")]

mod error;
mod serializer;
mod writer;

pub use error::{NodeShape, WriteError};
pub use serializer::{to_vec, to_writer, write_tree};
pub use writer::TreeWriter;
