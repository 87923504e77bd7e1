//! Transaction log certified data
//!
//! ```text
//! [0] operationType          PrintableString   mandatory
//! [1] clientId               PrintableString   optional
//! [2] processData            OCTET STRING      optional
//! [3] processType            PrintableString   optional
//! [4] additionalExternalData OCTET STRING      optional, kept raw
//! [5] transactionNumber      INTEGER           mandatory
//! [6] additionalInternalData OCTET STRING      optional, kept raw
//! ```

use num_bigint::BigUint;
use ttc_types::{Element, LogMessageKind, MessageKind, OperationType, Tag, TagClass, TransactionLog};

use super::{set_once, CertifiedDataDecoder};
use crate::der::{decode_ascii, decode_unsigned_integer};
use crate::error::{ParseError, ParseResult};

const OPERATION_TYPE: u8 = 0;
const CLIENT_ID: u8 = 1;
const PROCESS_DATA: u8 = 2;
const PROCESS_TYPE: u8 = 3;
const TRANSACTION_NUMBER: u8 = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionLogDecoder;

impl CertifiedDataDecoder for TransactionLogDecoder {
    fn kind(&self) -> MessageKind {
        MessageKind::Transaction
    }

    fn decode(&self, certified_data: &[Element]) -> ParseResult<LogMessageKind> {
        const KIND: MessageKind = MessageKind::Transaction;

        let mut operation_type: Option<OperationType> = None;
        let mut client_id: Option<String> = None;
        let mut process_data: Option<Vec<u8>> = None;
        let mut process_type: Option<String> = None;
        let mut transaction_number: Option<BigUint> = None;

        for element in certified_data {
            if element.tag.class() != TagClass::ContextSpecific || element.tag.is_constructed() {
                continue;
            }
            match element.tag.number() {
                OPERATION_TYPE => {
                    let text = decode_ascii(element.tag, &element.content)?;
                    let op = text
                        .parse::<OperationType>()
                        .map_err(|_| ParseError::UnknownOperationType { value: text })?;
                    set_once(&mut operation_type, op, KIND, "operationType")?;
                }
                CLIENT_ID => {
                    let text = decode_ascii(element.tag, &element.content)?;
                    set_once(&mut client_id, text, KIND, "clientId")?;
                }
                PROCESS_DATA => {
                    set_once(&mut process_data, element.content.clone(), KIND, "processData")?;
                }
                PROCESS_TYPE => {
                    let text = decode_ascii(element.tag, &element.content)?;
                    set_once(&mut process_type, text, KIND, "processType")?;
                }
                TRANSACTION_NUMBER => {
                    let number = decode_unsigned_integer(&element.content)?;
                    set_once(&mut transaction_number, number, KIND, "transactionNumber")?;
                }
                _ => {}
            }
        }

        Ok(LogMessageKind::Transaction(TransactionLog {
            operation_type: operation_type
                .ok_or_else(|| ParseError::missing_certified_data_field(KIND, "operationType"))?,
            client_id,
            process_data,
            process_type,
            transaction_number: transaction_number.ok_or_else(|| {
                ParseError::missing_certified_data_field(KIND, "transactionNumber")
            })?,
        }))
    }
}

/// Encode transaction fields as certifiedData elements in tag order
pub fn transaction_elements(tx: &TransactionLog) -> Vec<Element> {
    let mut elements = vec![Element::new(
        Tag::context(OPERATION_TYPE),
        tx.operation_type.as_str().as_bytes(),
    )];
    if let Some(client_id) = &tx.client_id {
        elements.push(Element::new(Tag::context(CLIENT_ID), client_id.as_bytes()));
    }
    if let Some(data) = &tx.process_data {
        elements.push(Element::new(Tag::context(PROCESS_DATA), data.as_slice()));
    }
    if let Some(process_type) = &tx.process_type {
        elements.push(Element::new(Tag::context(PROCESS_TYPE), process_type.as_bytes()));
    }
    elements.push(Element::new(
        Tag::context(TRANSACTION_NUMBER),
        crate::der::encode_unsigned_integer(&tx.transaction_number),
    ));
    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(elements: Vec<Element>) -> ParseResult<TransactionLog> {
        match TransactionLogDecoder.decode(&elements)? {
            LogMessageKind::Transaction(tx) => Ok(tx),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_minimal_transaction() {
        let tx = decode(vec![
            Element::new(Tag::context(0), b"StartTransaction".as_slice()),
            Element::new(Tag::context(5), vec![0x2a]),
        ])
        .unwrap();
        assert_eq!(tx.operation_type, OperationType::Start);
        assert_eq!(tx.transaction_number, BigUint::from(42u8));
        assert_eq!(tx.client_id, None);
    }

    #[test]
    fn test_optional_and_unknown_fields() {
        let tx = decode(vec![
            Element::new(Tag::context(0), b"UpdateTransaction".as_slice()),
            Element::new(Tag::context(1), b"POS-7".as_slice()),
            Element::new(Tag::context(2), vec![1, 2, 3]),
            Element::new(Tag::context(3), b"Kassenbeleg-V1".as_slice()),
            Element::new(Tag::context(4), vec![9]),
            Element::new(Tag::context(5), vec![0x01, 0x00]),
            Element::new(Tag::context(6), vec![8]),
        ])
        .unwrap();
        assert_eq!(tx.operation_type, OperationType::Update);
        assert_eq!(tx.client_id.as_deref(), Some("POS-7"));
        assert_eq!(tx.process_data, Some(vec![1, 2, 3]));
        assert_eq!(tx.process_type.as_deref(), Some("Kassenbeleg-V1"));
        assert_eq!(tx.transaction_number, BigUint::from(256u16));
    }

    #[test]
    fn test_missing_mandatory_fields() {
        assert_eq!(
            decode(vec![Element::new(Tag::context(5), vec![1])]),
            Err(ParseError::missing_certified_data_field(
                MessageKind::Transaction,
                "operationType"
            ))
        );
        assert_eq!(
            decode(vec![Element::new(Tag::context(0), b"FinishTransaction".as_slice())]),
            Err(ParseError::missing_certified_data_field(
                MessageKind::Transaction,
                "transactionNumber"
            ))
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            decode(vec![
                Element::new(Tag::context(0), b"CancelTransaction".as_slice()),
                Element::new(Tag::context(5), vec![1]),
            ]),
            Err(ParseError::UnknownOperationType {
                value: "CancelTransaction".to_string()
            })
        );
        assert!(decode(vec![
            Element::new(Tag::context(0), b"StartTransaction".as_slice()),
            Element::new(Tag::context(5), vec![0xff]),
        ])
        .is_err());
        assert_eq!(
            decode(vec![
                Element::new(Tag::context(0), b"StartTransaction".as_slice()),
                Element::new(Tag::context(0), b"StartTransaction".as_slice()),
                Element::new(Tag::context(5), vec![1]),
            ]),
            Err(ParseError::duplicate_certified_data_field(
                MessageKind::Transaction,
                "operationType"
            ))
        );
    }

    #[test]
    fn test_elements_decode_back() {
        let tx = TransactionLog {
            operation_type: OperationType::Finish,
            client_id: Some("c1".to_string()),
            process_data: None,
            process_type: None,
            transaction_number: BigUint::from(7u8),
        };
        assert_eq!(decode(transaction_elements(&tx)).unwrap(), tx);
    }
}
