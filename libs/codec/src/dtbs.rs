//! # DTBS Re-derivation
//!
//! Rebuilds the data-to-be-signed, and the complete record, from decoded
//! fields. Because the parser only accepts canonical DER, the bytes produced
//! here for a parsed record equal the DTBS the parser cached.

use ttc_types::{LogMessage, LogMessageFields, LogTime, Tag};

use crate::der::{encode_element, encode_i64, encode_oid, encode_tlv, encode_unsigned_integer};

/// DTBS of a parsed record, recomputed from its fields
pub fn encode_dtbs(message: &LogMessage) -> Vec<u8> {
    encode_dtbs_fields(message.fields())
}

/// True when the recomputed DTBS equals the cached one
pub fn dtbs_matches(message: &LogMessage) -> bool {
    encode_dtbs(message) == message.dtbs()
}

/// DTBS from fields: everything signed, in record order
pub fn encode_dtbs_fields(fields: &LogMessageFields) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    write_signed_fields(fields, &mut out, false);
    out
}

/// Complete DER record: `SEQUENCE { signed fields, signatureValue }`
pub fn encode_log_message(fields: &LogMessageFields) -> Vec<u8> {
    let mut body = Vec::with_capacity(160);
    write_signed_fields(fields, &mut body, true);
    encode_tlv(Tag::OCTET_STRING, &fields.signature_value, &mut body);

    let mut out = Vec::with_capacity(body.len() + 4);
    encode_tlv(Tag::SEQUENCE, &body, &mut out);
    out
}

fn write_signed_fields(fields: &LogMessageFields, out: &mut Vec<u8>, algorithm_header: bool) {
    encode_tlv(Tag::INTEGER, &encode_i64(i64::from(fields.version)), out);
    encode_tlv(
        Tag::OBJECT_IDENTIFIER,
        &encode_oid(&fields.certified_data_type),
        out,
    );
    for element in &fields.certified_data {
        encode_element(element, out);
    }
    encode_tlv(Tag::OCTET_STRING, fields.serial_number.as_bytes(), out);

    let mut algorithm = Vec::new();
    encode_tlv(
        Tag::OBJECT_IDENTIFIER,
        &encode_oid(&fields.signature_algorithm.algorithm),
        &mut algorithm,
    );
    for parameter in &fields.signature_algorithm.parameters {
        encode_element(parameter, &mut algorithm);
    }
    if algorithm_header {
        encode_tlv(Tag::SEQUENCE, &algorithm, out);
    } else {
        out.extend_from_slice(&algorithm);
    }

    if let Some(audit) = &fields.se_audit_data {
        encode_tlv(Tag::OCTET_STRING, audit, out);
    }
    encode_tlv(
        Tag::INTEGER,
        &encode_unsigned_integer(&fields.signature_counter),
        out,
    );
    match &fields.log_time {
        LogTime::UnixTime(secs) => encode_tlv(Tag::INTEGER, &encode_i64(*secs), out),
        LogTime::UtcTime(text) => encode_tlv(Tag::UTC_TIME, text.as_bytes(), out),
        LogTime::GeneralizedTime(text) => {
            encode_tlv(Tag::GENERALIZED_TIME, text.as_bytes(), out)
        }
    }
}
