//! # Log Message Records
//!
//! ## Purpose
//!
//! Typed view of one signed log message. The common header fields are shared
//! by every kind; the kind-specific part lives in [`LogMessageKind`], a closed
//! enum decided at parse time from the certified-data type.
//!
//! ## Invariants
//!
//! - `dtbs` is fixed at construction and has no setter
//! - transaction-only fields are reachable only through
//!   [`LogMessage::transaction_log`], which returns `None` for other kinds

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::errors::TypeError;
use crate::log_time::LogTime;
use crate::oid::{self, ObjectIdentifier};

/// Device serial number as raw bytes
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SerialNumber(pub Vec<u8>);

impl SerialNumber {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerialNumber({})", self.to_hex())
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<&[u8]> for SerialNumber {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Transaction operation carried in a transaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Start,
    Update,
    Finish,
}

impl OperationType {
    /// Text as encoded in the record
    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Start => "StartTransaction",
            OperationType::Update => "UpdateTransaction",
            OperationType::Finish => "FinishTransaction",
        }
    }

    /// Short form used in log file names
    pub fn file_name_label(self) -> &'static str {
        match self {
            OperationType::Start => "Start",
            OperationType::Update => "Update",
            OperationType::Finish => "Finish",
        }
    }
}

impl FromStr for OperationType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "StartTransaction" => Ok(OperationType::Start),
            "UpdateTransaction" => Ok(OperationType::Update),
            "FinishTransaction" => Ok(OperationType::Finish),
            other => Err(TypeError::UnknownOperationType {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction-log specific fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionLog {
    pub operation_type: OperationType,
    pub client_id: Option<String>,
    pub process_data: Option<Vec<u8>>,
    pub process_type: Option<String>,
    pub transaction_number: BigUint,
}

/// System-log specific fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemLog {
    pub operation_type: String,
    pub system_operation_data: Option<Vec<u8>>,
}

/// Kind-specific part of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMessageKind {
    Transaction(TransactionLog),
    System(SystemLog),
    /// Audit logs carry their payload in `seAuditData`, not in certified data
    Audit,
}

impl LogMessageKind {
    pub fn kind(&self) -> MessageKind {
        match self {
            LogMessageKind::Transaction(_) => MessageKind::Transaction,
            LogMessageKind::System(_) => MessageKind::System,
            LogMessageKind::Audit => MessageKind::Audit,
        }
    }
}

/// Certified-data type discriminant without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Transaction,
    System,
    Audit,
}

impl MessageKind {
    pub const ALL: [MessageKind; 3] = [
        MessageKind::Transaction,
        MessageKind::System,
        MessageKind::Audit,
    ];

    pub fn certified_data_type_arcs(self) -> &'static [u64] {
        match self {
            MessageKind::Transaction => oid::SE_API_TRANSACTION_LOG,
            MessageKind::System => oid::SE_API_SYSTEM_LOG,
            MessageKind::Audit => oid::SE_API_AUDIT_LOG,
        }
    }

    pub fn certified_data_type(self) -> ObjectIdentifier {
        ObjectIdentifier::from_static(self.certified_data_type_arcs())
    }

    pub fn from_certified_data_type(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| oid.matches(kind.certified_data_type_arcs()))
    }

    /// Marker the log file naming convention embeds for this kind
    pub fn file_name_marker(self) -> &'static str {
        match self {
            MessageKind::Transaction => "_Log-Tra",
            MessageKind::System => "_Log-Sys",
            MessageKind::Audit => "_Log-Aud",
        }
    }

    /// Declared kind from a log file name, if the name follows the convention
    ///
    /// The marker must directly follow the `_Sig-<counter>` segment, e.g.
    /// `Unixt_1600000000_Sig-7_Log-Tra_No-3_Start.log`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, after_sig) = file_name.split_once("_Sig-")?;
        let rest = after_sig.trim_start_matches(|c: char| c.is_ascii_digit());
        if rest.len() == after_sig.len() {
            return None;
        }
        Self::ALL.into_iter().find(|kind| {
            rest.strip_prefix(kind.file_name_marker())
                .is_some_and(|tail| tail.starts_with(['_', '.']))
        })
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Transaction => f.write_str("transaction log"),
            MessageKind::System => f.write_str("system log"),
            MessageKind::Audit => f.write_str("audit log"),
        }
    }
}

/// Signature algorithm identifier with its optional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureAlgorithm {
    pub algorithm: ObjectIdentifier,
    pub parameters: Vec<Element>,
}

/// Everything a record holds except the DTBS bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessageFields {
    pub version: u8,
    pub certified_data_type: ObjectIdentifier,
    pub certified_data: Vec<Element>,
    pub kind: LogMessageKind,
    pub serial_number: SerialNumber,
    pub signature_algorithm: SignatureAlgorithm,
    pub se_audit_data: Option<Vec<u8>>,
    pub signature_counter: BigUint,
    pub log_time: LogTime,
    pub signature_value: Vec<u8>,
    pub file_name: String,
}

/// Identity used by reporters to key findings by record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageIdentity {
    pub file_name: String,
    pub serial_number: SerialNumber,
    pub signature_counter: BigUint,
}

/// One parsed, signed log message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    fields: LogMessageFields,
    dtbs: Vec<u8>,
}

impl LogMessage {
    /// Assemble a record from its fields and the DTBS bytes computed while parsing
    pub fn new(fields: LogMessageFields, dtbs: Vec<u8>) -> Self {
        Self { fields, dtbs }
    }

    pub fn version(&self) -> u8 {
        self.fields.version
    }

    pub fn certified_data_type(&self) -> &ObjectIdentifier {
        &self.fields.certified_data_type
    }

    pub fn certified_data(&self) -> &[Element] {
        &self.fields.certified_data
    }

    pub fn kind(&self) -> &LogMessageKind {
        &self.fields.kind
    }

    pub fn message_kind(&self) -> MessageKind {
        self.fields.kind.kind()
    }

    /// Transaction fields, present only on transaction logs
    pub fn transaction_log(&self) -> Option<&TransactionLog> {
        match &self.fields.kind {
            LogMessageKind::Transaction(tx) => Some(tx),
            _ => None,
        }
    }

    pub fn system_log(&self) -> Option<&SystemLog> {
        match &self.fields.kind {
            LogMessageKind::System(sys) => Some(sys),
            _ => None,
        }
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.fields.serial_number
    }

    pub fn signature_algorithm(&self) -> &SignatureAlgorithm {
        &self.fields.signature_algorithm
    }

    pub fn se_audit_data(&self) -> Option<&[u8]> {
        self.fields.se_audit_data.as_deref()
    }

    pub fn signature_counter(&self) -> &BigUint {
        &self.fields.signature_counter
    }

    pub fn log_time(&self) -> &LogTime {
        &self.fields.log_time
    }

    pub fn signature_value(&self) -> &[u8] {
        &self.fields.signature_value
    }

    /// Exact bytes covered by the signature, cached at parse time
    pub fn dtbs(&self) -> &[u8] {
        &self.dtbs
    }

    pub fn file_name(&self) -> &str {
        &self.fields.file_name
    }

    pub fn fields(&self) -> &LogMessageFields {
        &self.fields
    }

    pub fn identity(&self) -> MessageIdentity {
        MessageIdentity {
            file_name: self.fields.file_name.clone(),
            serial_number: self.fields.serial_number.clone(),
            signature_counter: self.fields.signature_counter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_text() {
        for op in [
            OperationType::Start,
            OperationType::Update,
            OperationType::Finish,
        ] {
            assert_eq!(op.as_str().parse::<OperationType>().unwrap(), op);
        }
        assert!(matches!(
            "Cancel".parse::<OperationType>(),
            Err(TypeError::UnknownOperationType { .. })
        ));
    }

    #[test]
    fn test_kind_lookup() {
        let oid = ObjectIdentifier::from_static(oid::SE_API_SYSTEM_LOG);
        assert_eq!(MessageKind::from_certified_data_type(&oid), Some(MessageKind::System));

        let other: ObjectIdentifier = "1.2.3".parse().unwrap();
        assert_eq!(MessageKind::from_certified_data_type(&other), None);
    }

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(
            MessageKind::from_file_name("Unixt_1600000000_Sig-7_Log-Tra_No-3_Start.log"),
            Some(MessageKind::Transaction)
        );
        assert_eq!(
            MessageKind::from_file_name("Gent_20200913121640Z_Sig-9_Log-Aud.log"),
            Some(MessageKind::Audit)
        );
        assert_eq!(MessageKind::from_file_name("message.bin"), None);
    }

    #[test]
    fn test_kind_from_file_name_uses_marker_after_counter() {
        assert_eq!(
            MessageKind::from_file_name("Unixt_1_Sig-2_Log-Sys_Log-Tra.log"),
            Some(MessageKind::System)
        );
        assert_eq!(
            MessageKind::from_file_name("UTCTime_200913121640Z_Sig-3_Log-Sys_UpdateTime.log"),
            Some(MessageKind::System)
        );
        // Marker elsewhere in the name does not count
        assert_eq!(MessageKind::from_file_name("backup_Log-Tra_Sig-2.log"), None);
        assert_eq!(MessageKind::from_file_name("Unixt_1_Sig-_Log-Tra.log"), None);
        assert_eq!(MessageKind::from_file_name("Unixt_1_Sig-2_Log-Transfer.log"), None);
    }

    #[test]
    fn test_serial_hex() {
        let serial = SerialNumber(vec![0xde, 0xad, 0x01]);
        assert_eq!(serial.to_string(), "dead01");
    }

    #[test]
    fn test_operation_type_serde() {
        let json = serde_json::to_string(&OperationType::Finish).unwrap();
        assert_eq!(json, "\"Finish\"");
    }
}
