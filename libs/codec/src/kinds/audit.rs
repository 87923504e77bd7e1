//! Audit logs keep their payload in `seAuditData`; certified data carries
//! nothing the audit kind interprets.

use ttc_types::{Element, LogMessageKind, MessageKind};

use super::CertifiedDataDecoder;
use crate::error::ParseResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogDecoder;

impl CertifiedDataDecoder for AuditLogDecoder {
    fn kind(&self) -> MessageKind {
        MessageKind::Audit
    }

    fn decode(&self, _certified_data: &[Element]) -> ParseResult<LogMessageKind> {
        Ok(LogMessageKind::Audit)
    }
}
