//! Decoding errors for DER elements and log messages
//!
//! Every failure carries enough context to locate the offending bytes: DER
//! errors report the absolute offset into the record, parse errors name the
//! field being read. Errors are values; nothing in this crate panics on
//! malformed input.

use thiserror::Error;
use ttc_types::{MessageKind, ObjectIdentifier, Tag};

/// Low-level DER decoding failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DerError {
    /// Input ended before the declared structure was complete
    #[error("Truncated DER at offset {offset}: need {need} bytes, got {got} (reading {context})")]
    Truncated {
        offset: usize,
        need: usize,
        got: usize,
        context: &'static str,
    },

    /// Long-form length does not fit the platform word
    #[error("DER length overflow at offset {offset}: {octets} length octets exceed usize")]
    LengthOverflow { offset: usize, octets: usize },

    /// Indefinite length (0x80) is BER only
    #[error("Indefinite length at offset {offset} is not allowed in DER")]
    IndefiniteLength { offset: usize },

    /// Length octet 0xFF is reserved by X.690
    #[error("Reserved length octet 0xff at offset {offset}")]
    ReservedLength { offset: usize },

    /// Length was encoded in more octets than necessary
    #[error("Non-minimal length encoding at offset {offset} for length {value}")]
    NonMinimalLength { offset: usize, value: usize },

    /// Identifier uses the high-tag-number form
    #[error("Unsupported high tag number form {tag:#04x} at offset {offset}")]
    UnsupportedTag { offset: usize, tag: u8 },

    /// Bytes left over after a complete element
    #[error("Trailing data at offset {offset}: {remaining} bytes after the last element")]
    TrailingData { offset: usize, remaining: usize },

    /// Tried to read children of a primitive element
    #[error("Element {tag} is primitive and has no children")]
    NotConstructed { tag: Tag },

    /// INTEGER with no content octets
    #[error("INTEGER has no content octets")]
    EmptyInteger,

    /// INTEGER with a redundant leading 0x00 or 0xff
    #[error("INTEGER is not minimally encoded (leading {leading:#04x})")]
    NonMinimalInteger { leading: u8 },

    /// Negative INTEGER where only non-negative values make sense
    #[error("INTEGER is negative where a non-negative value is required")]
    NegativeInteger,

    /// INTEGER wider than the target type
    #[error("INTEGER of {octets} octets does not fit in {target}")]
    IntegerTooLarge { octets: usize, target: &'static str },

    /// Malformed OBJECT IDENTIFIER content
    #[error("Invalid OBJECT IDENTIFIER: {reason}")]
    InvalidOid { reason: &'static str },

    /// String type content that is not ASCII
    #[error("Element {tag} does not hold an ASCII string")]
    InvalidString { tag: Tag },
}

impl DerError {
    pub fn truncated(offset: usize, need: usize, got: usize, context: &'static str) -> Self {
        Self::Truncated {
            offset,
            need,
            got,
            context,
        }
    }
}

/// Failures while mapping a decoded element sequence onto a log message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("DER error: {0}")]
    Der(#[from] DerError),

    /// Record exceeds the configured size limit
    #[error("Message too large: {size} bytes exceeds limit {limit}")]
    MessageTooLarge { size: usize, limit: usize },

    /// Outer element is not a SEQUENCE
    #[error("Log message must be a SEQUENCE, found {found}")]
    NotASequence { found: Tag },

    /// Element stream ended before a required field
    #[error("Missing field {field}: no elements left")]
    MissingField { field: &'static str },

    /// Field present but with the wrong tag
    #[error("Unexpected tag for {field} at element {index}: expected {expected}, found {found}")]
    UnexpectedTag {
        field: &'static str,
        index: usize,
        expected: Tag,
        found: Tag,
    },

    /// logTime is none of INTEGER, UTCTime or GeneralizedTime
    #[error("Unexpected logTime tag {found}: expected INTEGER, UTCTime or GeneralizedTime")]
    UnexpectedLogTimeTag { found: Tag },

    /// Version does not fit the version field
    #[error("Unsupported log message version {value}")]
    InvalidVersion { value: i64 },

    /// certifiedDataType does not match the kind the file declares
    #[error("certifiedDataType mismatch for {declared}: expected {expected}, found {found}")]
    CertifiedDataTypeMismatch {
        declared: MessageKind,
        expected: ObjectIdentifier,
        found: ObjectIdentifier,
    },

    /// certifiedDataType is not one of the known log kinds
    #[error("Unknown certifiedDataType {found}")]
    UnknownCertifiedDataType { found: ObjectIdentifier },

    /// certifiedData region holds more elements than allowed
    #[error("Too many certifiedData elements: limit is {limit}")]
    TooManyCertifiedDataElements { limit: usize },

    /// Mandatory kind-specific field absent from certifiedData
    #[error("Missing {field} in {kind} certifiedData")]
    MissingCertifiedDataField {
        kind: MessageKind,
        field: &'static str,
    },

    /// Kind-specific field appears more than once
    #[error("Duplicate {field} in {kind} certifiedData")]
    DuplicateCertifiedDataField {
        kind: MessageKind,
        field: &'static str,
    },

    /// operationType of a transaction log is not a known operation
    #[error("Unknown transaction operationType '{value}'")]
    UnknownOperationType { value: String },

    /// Elements left after signatureValue
    #[error("{count} unexpected elements after signatureValue")]
    TrailingElements { count: usize },
}

impl ParseError {
    pub fn unexpected_tag(field: &'static str, index: usize, expected: Tag, found: Tag) -> Self {
        Self::UnexpectedTag {
            field,
            index,
            expected,
            found,
        }
    }

    pub fn missing_certified_data_field(kind: MessageKind, field: &'static str) -> Self {
        Self::MissingCertifiedDataField { kind, field }
    }

    pub fn duplicate_certified_data_field(kind: MessageKind, field: &'static str) -> Self {
        Self::DuplicateCertifiedDataField { kind, field }
    }
}

/// Certificate file name checks
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertificateError {
    /// Name does not follow `<HEX>_X509.<ext>`
    #[error("Invalid certificate file name '{file_name}': {reason}")]
    InvalidFileName {
        file_name: String,
        reason: &'static str,
    },

    /// Identifier in the file name differs from the certificate subject
    #[error("Certificate subject mismatch: file name says {expected}, subject is {found}")]
    FilenameToSubjectMismatch { expected: String, found: String },

    /// Identifier in the file name differs from the public key hash
    #[error("Certificate public key mismatch: file name says {expected}, key hashes to {found}")]
    FilenameToPubKeyMismatch { expected: String, found: String },
}

pub type DerResult<T> = std::result::Result<T, DerError>;

pub type ParseResult<T> = std::result::Result<T, ParseError>;
