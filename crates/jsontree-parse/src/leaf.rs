//! Leaf events produced by the parser.

/// A leaf value together with the path of keys leading to it.
///
/// Borrowed from the [`Parser`](crate::Parser) that produced it; the path
/// and value are only valid until the parser is advanced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf<'p> {
    pub(crate) path: &'p [Vec<u8>],
    pub(crate) value: &'p [u8],
    pub(crate) member: usize,
    pub(crate) offset: u64,
}

impl<'p> Leaf<'p> {
    /// Keys from the document root down to this leaf, never empty.
    ///
    /// Keys are the raw bytes found between the quotes, escape markers
    /// included.
    #[inline]
    pub fn path(&self) -> &'p [Vec<u8>] {
        self.path
    }

    /// Raw value bytes found between the quotes.
    #[inline]
    pub fn value(&self) -> &'p [u8] {
        self.value
    }

    /// The key of the leaf itself (last path component).
    #[inline]
    pub fn key(&self) -> &'p [u8] {
        match self.path.last() {
            Some(key) => key,
            None => &[],
        }
    }

    /// Zero-based index of the root object's member that contains this leaf.
    ///
    /// A well-formed document has a single member, so every leaf reports `0`.
    /// Documents with several root members (as produced by a writer without a
    /// parent key) count up from there.
    #[inline]
    pub fn member(&self) -> usize {
        self.member
    }

    /// Byte offset of the value's opening quote.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Copy the leaf out of the parser.
    pub fn into_owned(self) -> OwnedLeaf {
        OwnedLeaf {
            path: self.path.to_vec(),
            value: self.value.to_vec(),
            member: self.member,
            offset: self.offset,
        }
    }
}

/// An owned copy of a [`Leaf`], as yielded by the parser's `Iterator` impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedLeaf {
    /// Keys from the document root down to this leaf.
    pub path: Vec<Vec<u8>>,
    /// Raw value bytes.
    pub value: Vec<u8>,
    /// Index of the containing root member.
    pub member: usize,
    /// Byte offset of the value's opening quote.
    pub offset: u64,
}
