//! # Log Message Builder
//!
//! ## Purpose
//!
//! Produces DER-encoded log messages of any kind together with the file
//! name an archive would store them under. Tests and benchmarks use it
//! instead of binary fixtures; tools that need to fabricate archives can use
//! it too.
//!
//! ## Defaults
//!
//! Version 2, serial number `HelloWorld`, ecdsa-plain-SHA256 without
//! parameters, signature counter 1, Unix log time 0 and a 64-byte zero
//! signature. Every default can be overridden.
//!
//! ## Examples
//!
//! ```rust
//! use ttc_codec::{parse_log_message, LogMessageBuilder};
//! use ttc_types::OperationType;
//!
//! let builder = LogMessageBuilder::transaction(OperationType::Start, 1u32)
//!     .signature_counter(5u32)
//!     .client_id("POS-1");
//! assert_eq!(
//!     builder.file_name(),
//!     "Unixt_0_Sig-5_Log-Tra_No-1_Start_Client-POS-1.log"
//! );
//!
//! let message = parse_log_message(&builder.build(), &builder.file_name()).unwrap();
//! assert_eq!(message.transaction_log().unwrap().client_id.as_deref(), Some("POS-1"));
//! ```

use num_bigint::BigUint;
use ttc_types::{
    oid, Element, LogMessageFields, LogMessageKind, LogTime, MessageKind, ObjectIdentifier,
    OperationType, SerialNumber, SignatureAlgorithm, SystemLog, TransactionLog,
};

use crate::dtbs::{encode_dtbs_fields, encode_log_message};
use crate::kinds::{system_elements, transaction_elements};

const DEFAULT_VERSION: u8 = 2;
const DEFAULT_SERIAL: &[u8] = b"HelloWorld";
const DEFAULT_SIGNATURE_LEN: usize = 64;

/// Builder for signed log messages
#[derive(Debug, Clone)]
pub struct LogMessageBuilder {
    fields: LogMessageFields,
    extra_certified_data: Vec<Element>,
}

impl LogMessageBuilder {
    fn with_kind(kind: LogMessageKind) -> Self {
        let certified_data_type = kind.kind().certified_data_type();
        Self {
            fields: LogMessageFields {
                version: DEFAULT_VERSION,
                certified_data_type,
                certified_data: Vec::new(),
                kind,
                serial_number: SerialNumber(DEFAULT_SERIAL.to_vec()),
                signature_algorithm: SignatureAlgorithm {
                    algorithm: ObjectIdentifier::from_static(oid::ECDSA_PLAIN_SHA256),
                    parameters: Vec::new(),
                },
                se_audit_data: None,
                signature_counter: BigUint::from(1u8),
                log_time: LogTime::UnixTime(0),
                signature_value: vec![0; DEFAULT_SIGNATURE_LEN],
                file_name: String::new(),
            },
            extra_certified_data: Vec::new(),
        }
    }

    pub fn transaction(operation_type: OperationType, transaction_number: impl Into<BigUint>) -> Self {
        Self::with_kind(LogMessageKind::Transaction(TransactionLog {
            operation_type,
            client_id: None,
            process_data: None,
            process_type: None,
            transaction_number: transaction_number.into(),
        }))
    }

    pub fn system(operation_type: impl Into<String>) -> Self {
        Self::with_kind(LogMessageKind::System(SystemLog {
            operation_type: operation_type.into(),
            system_operation_data: None,
        }))
    }

    pub fn audit() -> Self {
        Self::with_kind(LogMessageKind::Audit)
    }

    pub fn version(mut self, version: u8) -> Self {
        self.fields.version = version;
        self
    }

    /// Override the certifiedDataType, e.g. to produce a mismatching record
    pub fn certified_data_type(mut self, oid: ObjectIdentifier) -> Self {
        self.fields.certified_data_type = oid;
        self
    }

    /// Append a raw certifiedData element after the kind's own fields
    pub fn certified_data_element(mut self, element: Element) -> Self {
        self.extra_certified_data.push(element);
        self
    }

    pub fn serial_number(mut self, serial: impl Into<Vec<u8>>) -> Self {
        self.fields.serial_number = SerialNumber(serial.into());
        self
    }

    pub fn signature_algorithm(mut self, algorithm: ObjectIdentifier) -> Self {
        self.fields.signature_algorithm.algorithm = algorithm;
        self
    }

    pub fn algorithm_parameter(mut self, parameter: Element) -> Self {
        self.fields.signature_algorithm.parameters.push(parameter);
        self
    }

    pub fn se_audit_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.fields.se_audit_data = Some(data.into());
        self
    }

    pub fn signature_counter(mut self, counter: impl Into<BigUint>) -> Self {
        self.fields.signature_counter = counter.into();
        self
    }

    pub fn log_time(mut self, log_time: LogTime) -> Self {
        self.fields.log_time = log_time;
        self
    }

    pub fn signature_value(mut self, signature: impl Into<Vec<u8>>) -> Self {
        self.fields.signature_value = signature.into();
        self
    }

    /// Compute the signature over the current DTBS
    pub fn signed_with(mut self, signer: impl FnOnce(&[u8]) -> Vec<u8>) -> Self {
        let dtbs = self.dtbs();
        self.fields.signature_value = signer(&dtbs);
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        if let LogMessageKind::Transaction(tx) = &mut self.fields.kind {
            tx.client_id = Some(client_id.into());
        }
        self
    }

    pub fn process_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        if let LogMessageKind::Transaction(tx) = &mut self.fields.kind {
            tx.process_data = Some(data.into());
        }
        self
    }

    pub fn process_type(mut self, process_type: impl Into<String>) -> Self {
        if let LogMessageKind::Transaction(tx) = &mut self.fields.kind {
            tx.process_type = Some(process_type.into());
        }
        self
    }

    pub fn system_operation_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        if let LogMessageKind::System(sys) = &mut self.fields.kind {
            sys.system_operation_data = Some(data.into());
        }
        self
    }

    /// Fields as the parser would report them for the built record
    pub fn fields(&self) -> LogMessageFields {
        let mut fields = self.fields.clone();
        fields.certified_data = match &fields.kind {
            LogMessageKind::Transaction(tx) => transaction_elements(tx),
            LogMessageKind::System(sys) => system_elements(sys),
            LogMessageKind::Audit => Vec::new(),
        };
        fields
            .certified_data
            .extend(self.extra_certified_data.iter().cloned());
        fields.file_name = self.file_name();
        fields
    }

    pub fn dtbs(&self) -> Vec<u8> {
        encode_dtbs_fields(&self.fields())
    }

    /// DER bytes of the complete record
    pub fn build(&self) -> Vec<u8> {
        encode_log_message(&self.fields())
    }

    /// File name following the archive naming convention
    pub fn file_name(&self) -> String {
        let fields = &self.fields;
        let mut name = format!(
            "{}_{}_Sig-{}{}",
            fields.log_time.file_name_prefix(),
            fields.log_time,
            fields.signature_counter,
            fields.kind.kind().file_name_marker(),
        );
        match &fields.kind {
            LogMessageKind::Transaction(tx) => {
                name.push_str(&format!(
                    "_No-{}_{}",
                    tx.transaction_number,
                    tx.operation_type.file_name_label()
                ));
                if let Some(client_id) = &tx.client_id {
                    name.push_str(&format!("_Client-{}", client_id));
                }
            }
            LogMessageKind::System(sys) => {
                name.push('_');
                name.push_str(&sys.operation_type);
            }
            LogMessageKind::Audit => {}
        }
        name.push_str(".log");
        name
    }

    pub fn message_kind(&self) -> MessageKind {
        self.fields.kind.kind()
    }
}
