//! # DER Element Reader
//!
//! ## Purpose
//!
//! Strict Distinguished Encoding Rules decoding of tag-length-value
//! elements, plus the matching encoders. Decoded elements borrow from the
//! input and keep their exact encoded bytes, which is what DTBS
//! reconstruction needs.
//!
//! ## Strictness
//!
//! Only canonical encodings are accepted so that re-encoding a decoded
//! element reproduces the input byte for byte:
//! - definite, minimal lengths (no `0x80`, no `0xff`, no leading zero octets)
//! - single-octet identifiers (high tag numbers are rejected)
//! - minimal two's complement INTEGERs and minimal OID sub-identifiers
//!
//! ## Examples
//!
//! ```rust
//! use ttc_codec::der::{decode_length, DerReader};
//! use ttc_types::Tag;
//!
//! assert_eq!(decode_length(&[0x81, 0xc8]).unwrap(), 200);
//!
//! let mut reader = DerReader::new(&[0x02, 0x01, 0x05]);
//! let element = reader.read_element().unwrap();
//! assert_eq!(element.tag, Tag::INTEGER);
//! assert_eq!(element.content(), &[0x05]);
//! ```

use num_bigint::BigUint;
use ttc_types::{Element, ObjectIdentifier, Tag};

use crate::error::{DerError, DerResult};

/// Length octet introducing the long form
const LONG_FORM: u8 = 0x80;
/// Reserved by X.690 8.1.3.5
const RESERVED_LENGTH: u8 = 0xFF;

/// A decoded element borrowing from the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRef<'a> {
    pub tag: Tag,
    /// Absolute offset of the identifier octet
    pub offset: usize,
    header_len: usize,
    raw: &'a [u8],
}

impl<'a> ElementRef<'a> {
    /// Content octets
    pub fn content(&self) -> &'a [u8] {
        &self.raw[self.header_len..]
    }

    /// Full encoding: identifier, length and content octets
    pub fn encoded(&self) -> &'a [u8] {
        self.raw
    }

    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Decode the content of a constructed element as a list of elements
    pub fn children(&self) -> DerResult<Vec<ElementRef<'a>>> {
        if !self.tag.is_constructed() {
            return Err(DerError::NotConstructed { tag: self.tag });
        }
        let mut reader = DerReader::with_base(self.content(), self.offset + self.header_len);
        let mut children = Vec::new();
        while !reader.is_empty() {
            children.push(reader.read_element()?);
        }
        Ok(children)
    }

    pub fn to_element(&self) -> Element {
        Element::new(self.tag, self.content())
    }
}

/// Forward-only cursor over DER bytes
#[derive(Debug, Clone)]
pub struct DerReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> DerReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    /// Reader whose error offsets are relative to an enclosing buffer
    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Absolute offset of the next unread byte
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read one identifier octet
    pub fn read_tag(&mut self) -> DerResult<Tag> {
        let offset = self.position();
        let byte = *self
            .data
            .get(self.pos)
            .ok_or_else(|| DerError::truncated(offset, 1, 0, "identifier"))?;
        let tag = Tag(byte);
        if tag.is_high_tag_number() {
            return Err(DerError::UnsupportedTag { offset, tag: byte });
        }
        self.pos += 1;
        Ok(tag)
    }

    /// Read a definite, minimally encoded length
    pub fn read_length(&mut self) -> DerResult<usize> {
        let offset = self.position();
        let first = *self
            .data
            .get(self.pos)
            .ok_or_else(|| DerError::truncated(offset, 1, 0, "length"))?;

        if first & LONG_FORM == 0 {
            self.pos += 1;
            return Ok(first as usize);
        }
        if first == LONG_FORM {
            return Err(DerError::IndefiniteLength { offset });
        }
        if first == RESERVED_LENGTH {
            return Err(DerError::ReservedLength { offset });
        }

        let count = (first & !LONG_FORM) as usize;
        let octets = self
            .data
            .get(self.pos + 1..self.pos + 1 + count)
            .ok_or_else(|| {
                DerError::truncated(offset, 1 + count, self.remaining(), "long-form length")
            })?;

        let mut value: usize = 0;
        for &octet in octets {
            value = value
                .checked_mul(256)
                .and_then(|v| v.checked_add(octet as usize))
                .ok_or(DerError::LengthOverflow {
                    offset,
                    octets: count,
                })?;
        }

        // Short form would have done, or a leading zero octet was spent
        if value < LONG_FORM as usize || octets[0] == 0 {
            return Err(DerError::NonMinimalLength { offset, value });
        }

        self.pos += 1 + count;
        Ok(value)
    }

    /// Read one complete element
    pub fn read_element(&mut self) -> DerResult<ElementRef<'a>> {
        let start = self.pos;
        let offset = self.position();
        let tag = self.read_tag()?;
        let len = self.read_length()?;
        let header_len = self.pos - start;

        if self.remaining() < len {
            return Err(DerError::truncated(offset, len, self.remaining(), "content"));
        }
        self.pos += len;

        Ok(ElementRef {
            tag,
            offset,
            header_len,
            raw: &self.data[start..self.pos],
        })
    }

    /// Read exactly one element spanning the whole input
    pub fn read_single(mut self) -> DerResult<ElementRef<'a>> {
        let element = self.read_element()?;
        if !self.is_empty() {
            return Err(DerError::TrailingData {
                offset: self.position(),
                remaining: self.remaining(),
            });
        }
        Ok(element)
    }
}

/// Decode a length field at the start of `bytes`
pub fn decode_length(bytes: &[u8]) -> DerResult<usize> {
    DerReader::new(bytes).read_length()
}

fn check_minimal_integer(content: &[u8]) -> DerResult<()> {
    match content {
        [] => Err(DerError::EmptyInteger),
        [0x00, next, ..] if next & 0x80 == 0 => Err(DerError::NonMinimalInteger { leading: 0x00 }),
        [0xFF, next, ..] if next & 0x80 != 0 => Err(DerError::NonMinimalInteger { leading: 0xFF }),
        _ => Ok(()),
    }
}

/// Decode INTEGER content that must be non-negative
pub fn decode_unsigned_integer(content: &[u8]) -> DerResult<BigUint> {
    check_minimal_integer(content)?;
    if content[0] & 0x80 != 0 {
        return Err(DerError::NegativeInteger);
    }
    Ok(BigUint::from_bytes_be(content))
}

/// Decode INTEGER content into a signed 64-bit value
pub fn decode_i64(content: &[u8]) -> DerResult<i64> {
    check_minimal_integer(content)?;
    if content.len() > 8 {
        return Err(DerError::IntegerTooLarge {
            octets: content.len(),
            target: "i64",
        });
    }
    let fill = if content[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut bytes = [fill; 8];
    bytes[8 - content.len()..].copy_from_slice(content);
    Ok(i64::from_be_bytes(bytes))
}

/// Decode OBJECT IDENTIFIER content into arcs
pub fn decode_oid(content: &[u8]) -> DerResult<ObjectIdentifier> {
    if content.is_empty() {
        return Err(DerError::InvalidOid {
            reason: "no content octets",
        });
    }

    let mut subidentifiers = Vec::new();
    let mut value: u64 = 0;
    let mut in_progress = false;
    for &octet in content {
        if !in_progress && octet == 0x80 {
            return Err(DerError::InvalidOid {
                reason: "sub-identifier has a leading 0x80 octet",
            });
        }
        value = value
            .checked_mul(128)
            .map(|v| v | u64::from(octet & 0x7F))
            .ok_or(DerError::InvalidOid {
                reason: "sub-identifier exceeds 64 bits",
            })?;
        if octet & 0x80 == 0 {
            subidentifiers.push(value);
            value = 0;
            in_progress = false;
        } else {
            in_progress = true;
        }
    }
    if in_progress {
        return Err(DerError::InvalidOid {
            reason: "last sub-identifier is unterminated",
        });
    }

    let first = subidentifiers[0];
    let (root, second) = match first {
        0..=39 => (0, first),
        40..=79 => (1, first - 40),
        _ => (2, first - 80),
    };
    let mut arcs = Vec::with_capacity(subidentifiers.len() + 1);
    arcs.push(root);
    arcs.push(second);
    arcs.extend_from_slice(&subidentifiers[1..]);

    ObjectIdentifier::new(arcs).map_err(|_| DerError::InvalidOid {
        reason: "arcs violate X.660 root rules",
    })
}

/// Decode string content that must be ASCII
pub fn decode_ascii(tag: Tag, content: &[u8]) -> DerResult<String> {
    if !content.is_ascii() {
        return Err(DerError::InvalidString { tag });
    }
    // ASCII is valid UTF-8
    Ok(content.iter().map(|&b| b as char).collect())
}

/// Append a minimal length field
pub fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < LONG_FORM as usize {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(LONG_FORM | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

/// Append a complete element
pub fn encode_tlv(tag: Tag, content: &[u8], out: &mut Vec<u8>) {
    out.push(tag.0);
    encode_length(content.len(), out);
    out.extend_from_slice(content);
}

pub fn encode_element(element: &Element, out: &mut Vec<u8>) {
    encode_tlv(element.tag, &element.content, out);
}

/// Minimal INTEGER content for a non-negative value
pub fn encode_unsigned_integer(value: &BigUint) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        let mut padded = Vec::with_capacity(bytes.len() + 1);
        padded.push(0);
        padded.extend_from_slice(&bytes);
        padded
    } else {
        bytes
    }
}

/// Minimal INTEGER content for a signed value
pub fn encode_i64(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

/// OBJECT IDENTIFIER content octets
pub fn encode_oid(oid: &ObjectIdentifier) -> Vec<u8> {
    let mut out = Vec::new();
    // ObjectIdentifier guarantees at least two arcs
    if let [root, second, rest @ ..] = oid.arcs() {
        push_base128(u128::from(*root) * 40 + u128::from(*second), &mut out);
        for &arc in rest {
            push_base128(u128::from(arc), &mut out);
        }
    }
    out
}

fn push_base128(value: u128, out: &mut Vec<u8>) {
    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push(0x80 | (rest & 0x7F) as u8);
        rest >>= 7;
    }
    out.extend(groups.iter().rev());
}
