//! # Log Message Parser
//!
//! ## Purpose
//!
//! Turns the DER bytes of one signed log message into a [`LogMessage`],
//! recording the data-to-be-signed (DTBS) on the way. The record is a
//! SEQUENCE whose children are walked with a forward cursor; each field
//! that contributes to the signature has its exact encoding appended to the
//! DTBS buffer as it is consumed.
//!
//! ## Record Layout
//!
//! ```text
//! SEQUENCE {
//!   version              INTEGER                     signed
//!   certifiedDataType    OBJECT IDENTIFIER           signed
//!   certifiedData        ...elements up to the next  signed
//!                        OCTET STRING
//!   serialNumber         OCTET STRING                signed
//!   signatureAlgorithm   SEQUENCE { OID, params.. }  children signed, header not
//!   seAuditData          OCTET STRING OPTIONAL       signed
//!   signatureCounter     INTEGER                     signed
//!   logTime              INTEGER | UTCTime |         signed
//!                        GeneralizedTime
//!   signatureValue       OCTET STRING                not signed
//! }
//! ```
//!
//! ## Kind Selection
//!
//! The certifiedDataType picks the kind. When the file name declares a kind
//! (`_Log-Tra`, `_Log-Sys` or `_Log-Aud` right after `_Sig-<counter>`) the
//! two must agree; a mismatch is
//! reported as [`ParseError::CertifiedDataTypeMismatch`].

use tracing::{debug, warn};
use ttc_config::ParserSettings;
use ttc_types::{
    Element, LogMessage, LogMessageFields, LogTime, MessageKind, SerialNumber,
    SignatureAlgorithm, Tag,
};

use crate::der::{decode_ascii, decode_i64, decode_oid, decode_unsigned_integer, DerReader, ElementRef};
use crate::error::{ParseError, ParseResult};
use crate::kinds::decoder_for;

/// Resource limits applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    pub max_message_size: usize,
    pub max_certified_data_elements: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self::from(&ParserSettings::default())
    }
}

impl From<&ParserSettings> for ParserLimits {
    fn from(settings: &ParserSettings) -> Self {
        Self {
            max_message_size: settings.max_message_size,
            max_certified_data_elements: settings.max_certified_data_elements,
        }
    }
}

/// Cursor over the record's top-level children that accumulates the DTBS
struct FieldCursor<'a> {
    elements: Vec<ElementRef<'a>>,
    index: usize,
    dtbs: Vec<u8>,
}

impl<'a> FieldCursor<'a> {
    fn new(elements: Vec<ElementRef<'a>>, capacity: usize) -> Self {
        Self {
            elements,
            index: 0,
            dtbs: Vec::with_capacity(capacity),
        }
    }

    fn peek(&self) -> Option<&ElementRef<'a>> {
        self.elements.get(self.index)
    }

    fn next_field(&mut self, field: &'static str) -> ParseResult<ElementRef<'a>> {
        let element = *self
            .elements
            .get(self.index)
            .ok_or(ParseError::MissingField { field })?;
        self.index += 1;
        Ok(element)
    }

    fn expect(&mut self, field: &'static str, expected: Tag) -> ParseResult<ElementRef<'a>> {
        let index = self.index;
        let element = self.next_field(field)?;
        if element.tag != expected {
            return Err(ParseError::unexpected_tag(field, index, expected, element.tag));
        }
        Ok(element)
    }

    /// Append an element's exact encoding to the DTBS
    fn sign(&mut self, element: &ElementRef<'_>) {
        self.dtbs.extend_from_slice(element.encoded());
    }

    fn remaining(&self) -> usize {
        self.elements.len() - self.index
    }
}

/// Log message parser with configurable limits
#[derive(Debug, Clone, Default)]
pub struct LogMessageParser {
    limits: ParserLimits,
}

impl LogMessageParser {
    pub fn new(limits: ParserLimits) -> Self {
        Self { limits }
    }

    pub fn from_settings(settings: &ParserSettings) -> Self {
        Self::new(ParserLimits::from(settings))
    }

    pub fn limits(&self) -> &ParserLimits {
        &self.limits
    }

    /// Parse a record, taking the declared kind from the file name if it has one
    pub fn parse(&self, bytes: &[u8], file_name: &str) -> ParseResult<LogMessage> {
        let declared = MessageKind::from_file_name(file_name);
        self.parse_with(declared, bytes, file_name)
    }

    /// Parse a record that must be of `kind`
    pub fn parse_as(
        &self,
        kind: MessageKind,
        bytes: &[u8],
        file_name: &str,
    ) -> ParseResult<LogMessage> {
        self.parse_with(Some(kind), bytes, file_name)
    }

    fn parse_with(
        &self,
        declared: Option<MessageKind>,
        bytes: &[u8],
        file_name: &str,
    ) -> ParseResult<LogMessage> {
        let result = self.parse_record(declared, bytes, file_name);
        match &result {
            Ok(message) => debug!(
                file_name,
                kind = %message.message_kind(),
                signature_counter = %message.signature_counter(),
                dtbs_len = message.dtbs().len(),
                "Parsed log message"
            ),
            Err(e) => warn!(file_name, error = %e, "Failed to parse log message"),
        }
        result
    }

    fn parse_record(
        &self,
        declared: Option<MessageKind>,
        bytes: &[u8],
        file_name: &str,
    ) -> ParseResult<LogMessage> {
        if bytes.len() > self.limits.max_message_size {
            return Err(ParseError::MessageTooLarge {
                size: bytes.len(),
                limit: self.limits.max_message_size,
            });
        }

        let outer = DerReader::new(bytes).read_single()?;
        if outer.tag != Tag::SEQUENCE {
            return Err(ParseError::NotASequence { found: outer.tag });
        }
        let mut cursor = FieldCursor::new(outer.children()?, bytes.len());

        let version_el = cursor.expect("version", Tag::INTEGER)?;
        let raw_version = decode_i64(version_el.content())?;
        let version = u8::try_from(raw_version)
            .map_err(|_| ParseError::InvalidVersion { value: raw_version })?;
        cursor.sign(&version_el);

        let type_el = cursor.expect("certifiedDataType", Tag::OBJECT_IDENTIFIER)?;
        let certified_data_type = decode_oid(type_el.content())?;
        cursor.sign(&type_el);

        let found = MessageKind::from_certified_data_type(&certified_data_type);
        let kind = match (declared, found) {
            (Some(declared), Some(found)) if declared == found => found,
            (Some(declared), _) => {
                return Err(ParseError::CertifiedDataTypeMismatch {
                    declared,
                    expected: declared.certified_data_type(),
                    found: certified_data_type,
                })
            }
            (None, Some(found)) => found,
            (None, None) => {
                return Err(ParseError::UnknownCertifiedDataType {
                    found: certified_data_type,
                })
            }
        };

        let certified_data = self.collect_certified_data(&mut cursor)?;
        let kind_fields = decoder_for(kind).decode(&certified_data)?;

        let serial_el = cursor.expect("serialNumber", Tag::OCTET_STRING)?;
        cursor.sign(&serial_el);

        let algorithm_el = cursor.expect("signatureAlgorithm", Tag::SEQUENCE)?;
        let signature_algorithm = Self::signature_algorithm(&mut cursor, &algorithm_el)?;

        let se_audit_data = match cursor.peek() {
            Some(el) if el.tag == Tag::OCTET_STRING => {
                let el = *el;
                cursor.index += 1;
                cursor.sign(&el);
                Some(el.content().to_vec())
            }
            _ => None,
        };

        let counter_el = cursor.expect("signatureCounter", Tag::INTEGER)?;
        let signature_counter = decode_unsigned_integer(counter_el.content())?;
        cursor.sign(&counter_el);

        let time_el = cursor.next_field("logTime")?;
        let log_time = match time_el.tag {
            Tag::INTEGER => LogTime::UnixTime(decode_i64(time_el.content())?),
            Tag::UTC_TIME => LogTime::UtcTime(decode_ascii(time_el.tag, time_el.content())?),
            Tag::GENERALIZED_TIME => {
                LogTime::GeneralizedTime(decode_ascii(time_el.tag, time_el.content())?)
            }
            found => return Err(ParseError::UnexpectedLogTimeTag { found }),
        };
        cursor.sign(&time_el);

        // Not part of the signed data
        let signature_el = cursor.expect("signatureValue", Tag::OCTET_STRING)?;

        if cursor.remaining() > 0 {
            return Err(ParseError::TrailingElements {
                count: cursor.remaining(),
            });
        }

        let fields = LogMessageFields {
            version,
            certified_data_type,
            certified_data,
            kind: kind_fields,
            serial_number: SerialNumber::from(serial_el.content()),
            signature_algorithm,
            se_audit_data,
            signature_counter,
            log_time,
            signature_value: signature_el.content().to_vec(),
            file_name: file_name.to_string(),
        };
        Ok(LogMessage::new(fields, cursor.dtbs))
    }

    /// Every element up to the serialNumber OCTET STRING
    fn collect_certified_data(&self, cursor: &mut FieldCursor<'_>) -> ParseResult<Vec<Element>> {
        let mut certified_data = Vec::new();
        loop {
            let element = match cursor.peek() {
                Some(el) if el.tag == Tag::OCTET_STRING => break,
                Some(el) => *el,
                None => return Err(ParseError::MissingField { field: "serialNumber" }),
            };
            if certified_data.len() >= self.limits.max_certified_data_elements {
                return Err(ParseError::TooManyCertifiedDataElements {
                    limit: self.limits.max_certified_data_elements,
                });
            }
            cursor.index += 1;
            cursor.sign(&element);
            certified_data.push(element.to_element());
        }
        Ok(certified_data)
    }

    /// Algorithm OID and parameters; the SEQUENCE header itself is not signed
    fn signature_algorithm(
        cursor: &mut FieldCursor<'_>,
        sequence: &ElementRef<'_>,
    ) -> ParseResult<SignatureAlgorithm> {
        let children = sequence.children()?;
        let (algorithm_el, parameters) = children.split_first().ok_or(ParseError::MissingField {
            field: "signatureAlgorithm.algorithm",
        })?;
        if algorithm_el.tag != Tag::OBJECT_IDENTIFIER {
            return Err(ParseError::unexpected_tag(
                "signatureAlgorithm.algorithm",
                0,
                Tag::OBJECT_IDENTIFIER,
                algorithm_el.tag,
            ));
        }
        let algorithm = decode_oid(algorithm_el.content())?;
        cursor.sign(algorithm_el);
        for parameter in parameters {
            cursor.sign(parameter);
        }
        Ok(SignatureAlgorithm {
            algorithm,
            parameters: parameters.iter().map(ElementRef::to_element).collect(),
        })
    }
}

/// Parse with default limits; the file name may declare the kind
pub fn parse_log_message(bytes: &[u8], file_name: &str) -> ParseResult<LogMessage> {
    LogMessageParser::default().parse(bytes, file_name)
}

/// Parse with default limits, requiring `kind`
pub fn parse_log_message_as(
    kind: MessageKind,
    bytes: &[u8],
    file_name: &str,
) -> ParseResult<LogMessage> {
    LogMessageParser::default().parse_as(kind, bytes, file_name)
}
