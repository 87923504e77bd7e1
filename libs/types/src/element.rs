//! DER identifier octets and decoded elements.
//!
//! Only single-octet identifiers are modelled; the log format never uses
//! high tag numbers and the codec rejects them.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Class bits (the top two bits of an identifier octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TagClass {
    Universal = 0,
    Application = 1,
    ContextSpecific = 2,
    Private = 3,
}

/// A single DER identifier octet
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u8);

impl Tag {
    pub const INTEGER: Tag = Tag(0x02);
    pub const OCTET_STRING: Tag = Tag(0x04);
    pub const NULL: Tag = Tag(0x05);
    pub const OBJECT_IDENTIFIER: Tag = Tag(0x06);
    pub const PRINTABLE_STRING: Tag = Tag(0x13);
    pub const UTC_TIME: Tag = Tag(0x17);
    pub const GENERALIZED_TIME: Tag = Tag(0x18);
    pub const SEQUENCE: Tag = Tag(0x30);

    const CONSTRUCTED_BIT: u8 = 0x20;
    const NUMBER_MASK: u8 = 0x1F;

    /// Primitive context-specific tag `[n]` (IMPLICIT)
    pub const fn context(number: u8) -> Tag {
        Tag(0x80 | (number & Self::NUMBER_MASK))
    }

    pub fn class(self) -> TagClass {
        // Two bits always map onto one of the four variants
        TagClass::try_from(self.0 >> 6).unwrap_or(TagClass::Private)
    }

    pub fn is_constructed(self) -> bool {
        self.0 & Self::CONSTRUCTED_BIT != 0
    }

    /// Tag number within its class
    pub fn number(self) -> u8 {
        self.0 & Self::NUMBER_MASK
    }

    /// High-tag-number form marker (`0x1F` in the low bits)
    pub fn is_high_tag_number(self) -> bool {
        self.number() == Self::NUMBER_MASK
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::INTEGER => "INTEGER",
            Tag::OCTET_STRING => "OCTET STRING",
            Tag::NULL => "NULL",
            Tag::OBJECT_IDENTIFIER => "OBJECT IDENTIFIER",
            Tag::PRINTABLE_STRING => "PrintableString",
            Tag::UTC_TIME => "UTCTime",
            Tag::GENERALIZED_TIME => "GeneralizedTime",
            Tag::SEQUENCE => "SEQUENCE",
            _ => match self.class() {
                TagClass::ContextSpecific => "context-specific",
                TagClass::Application => "application",
                TagClass::Private => "private",
                TagClass::Universal => "universal",
            },
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:#04x} {})", self.0, self.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class() {
            TagClass::ContextSpecific => write!(f, "[{}] ({:#04x})", self.number(), self.0),
            _ => write!(f, "{} ({:#04x})", self.name(), self.0),
        }
    }
}

/// One decoded tag-length-value element with owned content octets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    pub tag: Tag,
    pub content: Vec<u8>,
}

impl Element {
    pub fn new(tag: Tag, content: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_bits() {
        assert_eq!(Tag::SEQUENCE.class(), TagClass::Universal);
        assert!(Tag::SEQUENCE.is_constructed());
        assert_eq!(Tag::SEQUENCE.number(), 0x10);
        assert!(!Tag::OCTET_STRING.is_constructed());

        let ctx = Tag::context(5);
        assert_eq!(ctx, Tag(0x85));
        assert_eq!(ctx.class(), TagClass::ContextSpecific);
        assert_eq!(ctx.number(), 5);
        assert!(!ctx.is_high_tag_number());
        assert!(Tag(0x1F).is_high_tag_number());
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::INTEGER.to_string(), "INTEGER (0x02)");
        assert_eq!(Tag::context(0).to_string(), "[0] (0x80)");
    }
}
