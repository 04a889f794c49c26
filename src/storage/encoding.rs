use std::{fmt, str::FromStr};

use bstr::ByteSlice;

use crate::protocol::utils::compare_no_case;

/// Text encoding used by [`Buffer::decode_text`](crate::Buffer::decode_text).
///
/// Decoding never fails: bytes that are not valid in the encoding are replaced by U+FFFD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
    /// 7 bit ASCII, bytes above 0x7F are replaced.
    Ascii,
}

impl Encoding {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => bytes.to_str_lossy().into_owned(),
            Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Encoding::Ascii => bytes
                .iter()
                .map(|&b| {
                    if b.is_ascii() {
                        b as char
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "iso-8859-1",
            Encoding::Ascii => "us-ascii",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown text encoding: {0}")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();
        let known: [(&[u8], Encoding); 8] = [
            (b"utf-8", Encoding::Utf8),
            (b"utf8", Encoding::Utf8),
            (b"latin1", Encoding::Latin1),
            (b"latin-1", Encoding::Latin1),
            (b"iso-8859-1", Encoding::Latin1),
            (b"iso8859-1", Encoding::Latin1),
            (b"ascii", Encoding::Ascii),
            (b"us-ascii", Encoding::Ascii),
        ];
        known
            .into_iter()
            .find(|(name, _)| compare_no_case(label.as_bytes(), name))
            .map(|(_, encoding)| encoding)
            .ok_or_else(|| UnknownEncoding(label.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_lossy() {
        assert_eq!(Encoding::Utf8.decode(b"caf\xc3\xa9"), "café");
        assert_eq!(Encoding::Utf8.decode(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn latin1_maps_every_byte() {
        assert_eq!(Encoding::Latin1.decode(b"caf\xe9"), "café");
    }

    #[test]
    fn ascii_replaces_high_bytes() {
        assert_eq!(Encoding::Ascii.decode(b"caf\xe9"), "caf\u{FFFD}");
    }

    #[test]
    fn labels() {
        assert_eq!("UTF-8".parse(), Ok(Encoding::Utf8));
        assert_eq!(" Latin1 ".parse(), Ok(Encoding::Latin1));
        assert_eq!("US-ASCII".parse(), Ok(Encoding::Ascii));
        assert_eq!(
            "ebcdic".parse::<Encoding>(),
            Err(UnknownEncoding("ebcdic".to_owned()))
        );
        for encoding in [Encoding::Utf8, Encoding::Latin1, Encoding::Ascii] {
            assert_eq!(encoding.label().parse(), Ok(encoding));
        }
    }
}
