//! Signature counter continuity per serial number
//!
//! Every record a secure element signs increments its signature counter, so
//! within one serial the counters seen in canonical order must step by one.
//! The first record of a serial sets the baseline. A gap re-synchronises the
//! expectation to the observed counter; a repeated or backwards counter
//! leaves it unchanged.

use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use ttc_types::{LogMessage, LogMessageArchive, SerialNumber};

use crate::issue::ValidationIssue;
use crate::result::ValidationResult;
use crate::validator::Validator;

const NAME: &str = "SignatureCounterValidator";

#[derive(Debug, Default)]
pub struct SignatureCounterValidator {
    last_seen: HashMap<SerialNumber, BigUint>,
}

impl SignatureCounterValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest accepted counter for a serial
    pub fn last_counter(&self, serial: &SerialNumber) -> Option<&BigUint> {
        self.last_seen.get(serial)
    }

    pub fn update_state(&mut self, message: &Arc<LogMessage>) -> Option<ValidationIssue> {
        let serial = message.serial_number();
        let counter = message.signature_counter();
        let Some(last) = self.last_seen.get(serial).cloned() else {
            self.last_seen.insert(serial.clone(), counter.clone());
            return None;
        };

        if *counter <= last {
            return Some(ValidationIssue::DuplicateSignatureCounter {
                message: Arc::clone(message),
                counter: counter.clone(),
            });
        }

        self.last_seen.insert(serial.clone(), counter.clone());
        let expected = last + 1u8;
        if *counter != expected {
            return Some(ValidationIssue::SignatureCounterGap {
                message: Arc::clone(message),
                expected,
                found: counter.clone(),
            });
        }
        None
    }
}

impl Validator for SignatureCounterValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn validate(&mut self, archive: &dyn LogMessageArchive) -> ValidationResult {
        let mut result = ValidationResult::for_validator(NAME);
        let messages = archive.sorted_log_messages();
        for message in messages {
            if let Some(issue) = self.update_state(message) {
                trace!(validator = NAME, kind = %issue.kind(), "{}", issue);
                result.push(NAME, issue);
            }
        }
        debug!(
            validator = NAME,
            records = messages.len(),
            findings = result.len(),
            "Signature counter validation complete"
        );
        result
    }

    fn into_validators(self: Box<Self>) -> Vec<Box<dyn Validator>> {
        vec![self]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueKind;
    use ttc_types::{
        oid, InMemoryArchive, LogMessageFields, LogMessageKind, LogTime, ObjectIdentifier,
        SignatureAlgorithm,
    };

    fn record(serial: &[u8], counter: u64) -> LogMessage {
        LogMessage::new(
            LogMessageFields {
                version: 2,
                certified_data_type: ObjectIdentifier::from_static(oid::SE_API_AUDIT_LOG),
                certified_data: Vec::new(),
                kind: LogMessageKind::Audit,
                serial_number: SerialNumber(serial.to_vec()),
                signature_algorithm: SignatureAlgorithm {
                    algorithm: ObjectIdentifier::from_static(oid::ECDSA_PLAIN_SHA256),
                    parameters: Vec::new(),
                },
                se_audit_data: None,
                signature_counter: BigUint::from(counter),
                log_time: LogTime::UnixTime(counter as i64),
                signature_value: Vec::new(),
                file_name: format!("Unixt_{}_Sig-{}_Log-Aud.log", counter, counter),
            },
            Vec::new(),
        )
    }

    fn kinds(result: &ValidationResult) -> Vec<IssueKind> {
        result.issues().map(ValidationIssue::kind).collect()
    }

    #[test]
    fn test_contiguous_counters_are_clean() {
        let archive = InMemoryArchive::from_messages((7..12).map(|c| record(b"A", c)));
        let mut validator = SignatureCounterValidator::new();
        assert!(validator.validate(&archive).is_empty());
        assert_eq!(validator.last_counter(&SerialNumber(b"A".to_vec())), Some(&BigUint::from(11u8)));
    }

    #[test]
    fn test_gap_resynchronises() {
        let archive =
            InMemoryArchive::from_messages([1, 2, 5, 6].into_iter().map(|c| record(b"A", c)));
        let result = SignatureCounterValidator::new().validate(&archive);
        assert_eq!(kinds(&result), vec![IssueKind::SignatureCounterGap]);
        match &result.findings()[0].issue {
            ValidationIssue::SignatureCounterGap {
                expected, found, ..
            } => {
                assert_eq!(expected, &BigUint::from(3u8));
                assert_eq!(found, &BigUint::from(5u8));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_repeated_counter_is_duplicate() {
        let mut validator = SignatureCounterValidator::new();
        let first = InMemoryArchive::from_messages([1, 2].into_iter().map(|c| record(b"A", c)));
        let second = InMemoryArchive::from_messages([2, 3].into_iter().map(|c| record(b"A", c)));
        assert!(validator.validate(&first).is_empty());

        // State carries over: 2 repeats, 3 continues from 2
        let result = validator.validate(&second);
        assert_eq!(kinds(&result), vec![IssueKind::DuplicateSignatureCounter]);
    }

    #[test]
    fn test_serials_are_independent() {
        let archive = InMemoryArchive::from_messages(vec![
            record(b"A", 1),
            record(b"B", 40),
            record(b"A", 2),
            record(b"B", 41),
        ]);
        assert!(SignatureCounterValidator::new().validate(&archive).is_empty());
    }
}
