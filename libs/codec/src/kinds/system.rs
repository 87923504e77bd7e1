//! System log certified data: `[0] operationType`, `[1] systemOperationData`.

use ttc_types::{Element, LogMessageKind, MessageKind, SystemLog, Tag, TagClass};

use super::{set_once, CertifiedDataDecoder};
use crate::der::decode_ascii;
use crate::error::{ParseError, ParseResult};

const OPERATION_TYPE: u8 = 0;
const SYSTEM_OPERATION_DATA: u8 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLogDecoder;

impl CertifiedDataDecoder for SystemLogDecoder {
    fn kind(&self) -> MessageKind {
        MessageKind::System
    }

    fn decode(&self, certified_data: &[Element]) -> ParseResult<LogMessageKind> {
        const KIND: MessageKind = MessageKind::System;

        let mut operation_type = None;
        let mut system_operation_data = None;
        for element in certified_data {
            if element.tag.class() != TagClass::ContextSpecific || element.tag.is_constructed() {
                continue;
            }
            match element.tag.number() {
                OPERATION_TYPE => {
                    let text = decode_ascii(element.tag, &element.content)?;
                    set_once(&mut operation_type, text, KIND, "operationType")?;
                }
                SYSTEM_OPERATION_DATA => set_once(
                    &mut system_operation_data,
                    element.content.clone(),
                    KIND,
                    "systemOperationData",
                )?,
                _ => {}
            }
        }

        Ok(LogMessageKind::System(SystemLog {
            operation_type: operation_type
                .ok_or_else(|| ParseError::missing_certified_data_field(KIND, "operationType"))?,
            system_operation_data,
        }))
    }
}

pub fn system_elements(sys: &SystemLog) -> Vec<Element> {
    let mut elements = vec![Element::new(
        Tag::context(OPERATION_TYPE),
        sys.operation_type.as_bytes(),
    )];
    if let Some(data) = &sys.system_operation_data {
        elements.push(Element::new(Tag::context(SYSTEM_OPERATION_DATA), data.as_slice()));
    }
    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_log() {
        let kind = SystemLogDecoder
            .decode(&[
                Element::new(Tag::context(0), b"UpdateTime".as_slice()),
                Element::new(Tag::context(1), vec![0x30, 0x00]),
            ])
            .unwrap();
        assert_eq!(
            kind,
            LogMessageKind::System(SystemLog {
                operation_type: "UpdateTime".to_string(),
                system_operation_data: Some(vec![0x30, 0x00]),
            })
        );
    }

    #[test]
    fn test_requires_operation_type() {
        assert_eq!(
            SystemLogDecoder.decode(&[]),
            Err(ParseError::missing_certified_data_field(
                MessageKind::System,
                "operationType"
            ))
        );
    }
}
