//! Two-digit tag, two-digit length TLV encoding.
//!
//! Lengths count UTF-16 code units, the same units the checksum walks. For
//! ASCII input this equals both the character and the byte count; other
//! input is outside the interchange format but still gets a consistent length.

use crate::error::{EmvError, Result};
use std::fmt;
use std::str::FromStr;

/// Largest value length expressible by the two-digit length field.
pub const MAX_VALUE_LEN: usize = 99;

/// A two-digit decimal field identifier (`00`..`99`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u8);

impl Tag {
    pub fn new(id: u8) -> Result<Self> {
        if id <= 99 {
            Ok(Self(id))
        } else {
            Err(EmvError::InvalidTag(id.to_string()))
        }
    }

    /// Builds a tag from a literal known to be in range.
    pub(crate) const fn from_static(id: u8) -> Self {
        assert!(id <= 99);
        Self(id)
    }

    pub fn id(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for Tag {
    type Err = EmvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.as_bytes() {
            [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
                Ok(Self((a - b'0') * 10 + (b - b'0')))
            }
            _ => Err(EmvError::InvalidTag(s.to_string())),
        }
    }
}

/// A single decoded tag-length-value entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    pub tag: Tag,
    pub value: String,
}

impl TlvField {
    /// Decodes this field's value as a sequence of nested fields.
    pub fn nested(&self) -> Result<Vec<TlvField>> {
        decode_fields(&self.value)
    }
}

/// Encodes `tag + len(value) + value`, with the length zero-padded to two digits.
///
/// The length counts UTF-16 code units. Values longer than
/// [`MAX_VALUE_LEN`] are rejected instead of producing an invalid length field.
pub fn encode_field(tag: Tag, value: &str) -> Result<String> {
    let length = value.encode_utf16().count();
    if length > MAX_VALUE_LEN {
        return Err(EmvError::ValueTooLong {
            tag: tag.to_string(),
            length,
        });
    }
    Ok(format!("{tag}{length:02}{value}"))
}

/// Wraps already-encoded subfields in a parent tag, preserving their order.
pub fn encode_composite<S: AsRef<str>>(tag: Tag, subfields: &[S]) -> Result<String> {
    let value: String = subfields.iter().map(AsRef::as_ref).collect();
    encode_field(tag, &value)
}

/// Parses a flat TLV string back into its fields.
pub fn decode_fields(input: &str) -> Result<Vec<TlvField>> {
    let mut fields = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let (header, tail) = split_units(rest, 4)
            .filter(|(header, _)| header.is_ascii())
            .ok_or_else(|| EmvError::Malformed(format!("truncated field header {rest:?}")))?;
        let (tag, length) = header.split_at(2);
        let tag: Tag = tag.parse()?;
        if !length.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EmvError::Malformed(format!(
                "non-numeric length {length:?} for tag {tag}"
            )));
        }
        let length: usize = length.parse().unwrap_or_default();
        let (value, tail) = split_units(tail, length).ok_or_else(|| {
            EmvError::Malformed(format!("value for tag {tag} runs past end of input"))
        })?;

        fields.push(TlvField {
            tag,
            value: value.to_string(),
        });
        rest = tail;
    }

    Ok(fields)
}

/// Splits after `n` UTF-16 code units; `None` if `s` is shorter or the split
/// would fall inside a surrogate pair.
fn split_units(s: &str, n: usize) -> Option<(&str, &str)> {
    let mut units = 0;
    for (idx, c) in s.char_indices() {
        if units == n {
            return Some(s.split_at(idx));
        }
        units += c.len_utf16();
    }
    (units == n).then(|| s.split_at(s.len()))
}
