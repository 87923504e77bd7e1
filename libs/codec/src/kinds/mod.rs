//! # Kind-specific certified data
//!
//! Each log kind interprets the certifiedData region differently. The
//! parser collects the region generically (every element up to the
//! serialNumber OCTET STRING) and hands it to the decoder for the kind the
//! certifiedDataType selected.

mod audit;
mod system;
mod transaction;

pub use audit::AuditLogDecoder;
pub use system::{system_elements, SystemLogDecoder};
pub use transaction::{transaction_elements, TransactionLogDecoder};

use ttc_types::{Element, LogMessageKind, MessageKind};

use crate::error::ParseResult;

/// Decoder for one kind's certifiedData region
pub trait CertifiedDataDecoder: Send + Sync {
    /// Kind this decoder handles
    fn kind(&self) -> MessageKind;

    /// Interpret the collected certifiedData elements
    ///
    /// Elements with tags the kind does not define are left alone; they stay
    /// available through `LogMessage::certified_data`.
    fn decode(&self, certified_data: &[Element]) -> ParseResult<LogMessageKind>;
}

/// Decoder for a kind
pub fn decoder_for(kind: MessageKind) -> &'static dyn CertifiedDataDecoder {
    match kind {
        MessageKind::Transaction => &TransactionLogDecoder,
        MessageKind::System => &SystemLogDecoder,
        MessageKind::Audit => &AuditLogDecoder,
    }
}

/// Store `value` in `slot`, failing if the field was already seen
fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    kind: MessageKind,
    field: &'static str,
) -> ParseResult<()> {
    if slot.is_some() {
        return Err(crate::error::ParseError::duplicate_certified_data_field(
            kind, field,
        ));
    }
    *slot = Some(value);
    Ok(())
}
