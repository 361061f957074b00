//! Leaf payload contract.

use std::borrow::Cow;
use std::convert::Infallible;
use std::string::FromUtf8Error;

/// A leaf payload that can be written between quotes and read back.
///
/// Both directions work on the raw wire bytes: `deserialize` receives the
/// bytes exactly as found between the quotes (escape markers included), and
/// `serialize` must return bytes that are already safe to place between
/// quotes. The codec never escapes or unescapes anything itself.
pub trait Value: Sized {
    /// Error returned by either direction.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encode the payload for the wire.
    fn serialize(&self) -> Result<Cow<'_, [u8]>, Self::Error>;

    /// Decode a payload from raw wire bytes.
    fn deserialize(raw: &[u8]) -> Result<Self, Self::Error>;
}

/// Raw bytes, passed through untouched.
impl Value for Vec<u8> {
    type Error = Infallible;

    fn serialize(&self) -> Result<Cow<'_, [u8]>, Self::Error> {
        Ok(Cow::Borrowed(self.as_slice()))
    }

    fn deserialize(raw: &[u8]) -> Result<Self, Self::Error> {
        Ok(raw.to_vec())
    }
}

/// Raw bytes that must be valid UTF-8. Escapes are kept as written.
impl Value for String {
    type Error = FromUtf8Error;

    fn serialize(&self) -> Result<Cow<'_, [u8]>, Self::Error> {
        Ok(Cow::Borrowed(self.as_bytes()))
    }

    fn deserialize(raw: &[u8]) -> Result<Self, Self::Error> {
        String::from_utf8(raw.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_bytes_pass_through() {
        let value = <Vec<u8>>::deserialize(br"a\nb").unwrap();
        assert_eq!(value, br"a\nb");
        assert_eq!(value.serialize().unwrap().as_ref(), br"a\nb");
    }

    #[test]
    fn test_string_keeps_escapes() {
        let value = String::deserialize(br#"\"hi\""#).unwrap();
        assert_eq!(value, r#"\"hi\""#);
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        assert!(String::deserialize(&[0xff, 0xfe]).is_err());
    }
}
