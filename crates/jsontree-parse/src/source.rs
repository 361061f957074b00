//! Byte-level access to the underlying reader.

use std::io::{self, BufRead};

/// A buffered reader with one byte of lookahead and a position counter.
pub(crate) struct ByteSource<R> {
    reader: R,
    pos: u64,
}

impl<R: BufRead> ByteSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub(crate) fn position(&self) -> u64 {
        self.pos
    }

    pub(crate) fn get_ref(&self) -> &R {
        &self.reader
    }

    pub(crate) fn into_inner(self) -> R {
        self.reader
    }

    /// Run `f` on the buffered bytes, refilling first and retrying reads
    /// that were interrupted. An empty slice means end of input.
    fn with_buf<T>(&mut self, f: impl FnOnce(&[u8]) -> T) -> io::Result<T> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(f(buf)),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    fn consume(&mut self, amount: usize) {
        self.reader.consume(amount);
        self.pos += amount as u64;
    }

    /// Look at the next byte without consuming it. `None` at end of input.
    pub(crate) fn peek(&mut self) -> io::Result<Option<u8>> {
        self.with_buf(|buf| buf.first().copied())
    }

    /// Consume and return the next byte. `None` at end of input.
    pub(crate) fn next(&mut self) -> io::Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.consume(1);
        }
        Ok(byte)
    }

    /// Consume the next byte; end of input is an error.
    pub(crate) fn require(&mut self) -> Result<u8, SourceError> {
        self.next()?.ok_or(SourceError::Eof)
    }

    /// Copy the body of a quoted string into `out`, up to and including the
    /// closing quote, which is consumed but not copied.
    ///
    /// A backslash and the byte after it are copied as a unit and never
    /// terminate the string.
    pub(crate) fn read_quoted(&mut self, out: &mut Vec<u8>) -> Result<(), SourceError> {
        loop {
            let (scanned, stop) = self.with_buf(|buf| {
                match buf.iter().position(|&b| b == b'"' || b == b'\\') {
                    Some(i) => {
                        out.extend_from_slice(&buf[..i]);
                        (i + 1, Some(buf[i]))
                    }
                    None => {
                        out.extend_from_slice(buf);
                        (buf.len(), None)
                    }
                }
            })?;
            if scanned == 0 {
                return Err(SourceError::Eof);
            }
            self.consume(scanned);
            match stop {
                Some(b'"') => return Ok(()),
                Some(_) => {
                    out.push(b'\\');
                    let escaped = self.require()?;
                    out.push(escaped);
                }
                None => {}
            }
        }
    }
}

/// Why the source could not hand out a byte.
#[derive(Debug)]
pub(crate) enum SourceError {
    /// The reader reported end of input.
    Eof,
    /// The reader failed.
    Io(io::Error),
}

impl From<io::Error> for SourceError {
    fn from(err: io::Error) -> Self {
        SourceError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn quoted(input: &[u8]) -> Result<(Vec<u8>, u64), SourceError> {
        // Tiny buffer so escapes straddle refills.
        let mut source = ByteSource::new(io::BufReader::with_capacity(2, input));
        let mut out = Vec::new();
        source.read_quoted(&mut out)?;
        Ok((out, source.position()))
    }

    #[test]
    fn test_read_quoted_stops_at_quote() {
        assert_eq!(quoted(b"abc\"def").unwrap(), (b"abc".to_vec(), 4));
    }

    #[test]
    fn test_read_quoted_keeps_escapes() {
        let (out, _) = quoted(br#"a\"b\\c\nd""#).unwrap();
        assert_eq!(out, br#"a\"b\\c\nd"#);
    }

    #[test]
    fn test_read_quoted_escape_at_buffer_edge() {
        let (out, pos) = quoted(br#"x\"""#).unwrap();
        assert_eq!(out, br#"x\""#);
        assert_eq!(pos, 4);
    }

    #[test]
    fn test_read_quoted_unterminated() {
        assert!(matches!(quoted(b"abc"), Err(SourceError::Eof)));
        assert!(matches!(quoted(b"abc\\"), Err(SourceError::Eof)));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut source = ByteSource::new(&b"{}"[..]);
        assert_eq!(source.peek().unwrap(), Some(b'{'));
        assert_eq!(source.position(), 0);
        assert_eq!(source.next().unwrap(), Some(b'{'));
        assert_eq!(source.next().unwrap(), Some(b'}'));
        assert_eq!(source.next().unwrap(), None);
        assert_eq!(source.position(), 2);
    }

    /// Reader interrupted before every read, including the final empty one.
    struct Interrupting<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl io::Read for Interrupting<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_interrupted_at_end_of_input() {
        let reader = Interrupting {
            data: b"{}",
            interrupt: false,
        };
        let mut source = ByteSource::new(io::BufReader::new(reader));
        assert_eq!(source.next().unwrap(), Some(b'{'));
        assert_eq!(source.next().unwrap(), Some(b'}'));
        assert_eq!(source.next().unwrap(), None);
        assert_eq!(source.position(), 2);
    }
}
