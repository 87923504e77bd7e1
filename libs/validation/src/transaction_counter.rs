//! # Transaction Counter Validator
//!
//! ## Purpose
//!
//! Checks transaction-number continuity and Start/Update/Finish consistency
//! per device serial number over the archive's canonical order.
//!
//! ## State
//!
//! - `expected[serial]`: next transaction number a Start should carry (1 when
//!   the serial is first seen)
//! - `transactions[(serial, number)]`: every started transaction, open or
//!   closed. Entries are never removed so duplicates are caught across the
//!   whole processed stream, including later archives.
//!
//! ## Start Handling
//!
//! ```text
//! expected <  number  → MissingTransactionCounter, expected = number + 1
//! expected == number  → expected += 1
//! known transaction   → DuplicateTransactionCounter, refresh last counter
//! expected >  number  → DelayedTransactionCounter (unknown transaction only)
//! ```

use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use ttc_types::{LogMessage, LogMessageArchive, OperationType, SerialNumber};

use crate::issue::ValidationIssue;
use crate::result::ValidationResult;
use crate::validator::Validator;

const NAME: &str = "TransactionCounterValidator";

/// A started transaction
#[derive(Debug, Clone, PartialEq, Eq)]
struct Transaction {
    signature_counter_last_update: BigUint,
    is_open: bool,
}

#[derive(Debug, Default)]
pub struct TransactionCounterValidator {
    expected: HashMap<SerialNumber, BigUint>,
    transactions: HashMap<(SerialNumber, BigUint), Transaction>,
}

impl TransactionCounterValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next transaction number expected for a serial, if it has been seen
    pub fn expected_transaction_number(&self, serial: &SerialNumber) -> Option<&BigUint> {
        self.expected.get(serial)
    }

    /// Whether a transaction has been started and not yet finished
    pub fn is_open(&self, serial: &SerialNumber, transaction_number: &BigUint) -> bool {
        self.transactions
            .get(&(serial.clone(), transaction_number.clone()))
            .is_some_and(|tx| tx.is_open)
    }

    /// Apply one record to the state, returning the findings it causes
    ///
    /// Records that are not transaction logs are ignored.
    pub fn update_state(&mut self, message: &Arc<LogMessage>) -> Vec<ValidationIssue> {
        let Some(tx) = message.transaction_log() else {
            return Vec::new();
        };
        let serial = message.serial_number().clone();
        let number = tx.transaction_number.clone();
        let expected = self
            .expected
            .entry(serial.clone())
            .or_insert_with(|| BigUint::from(1u8));

        let mut issues = Vec::new();
        let key = (serial, number.clone());

        match tx.operation_type {
            OperationType::Start => {
                let previous = expected.clone();
                if previous < number {
                    issues.push(ValidationIssue::MissingTransactionCounter {
                        message: Arc::clone(message),
                        expected: previous.clone(),
                        found: number.clone(),
                    });
                    *expected = &number + 1u8;
                } else if previous == number {
                    *expected += 1u8;
                }

                if let Some(existing) = self.transactions.get_mut(&key) {
                    issues.push(ValidationIssue::DuplicateTransactionCounter {
                        message: Arc::clone(message),
                        transaction_number: number,
                    });
                    existing.signature_counter_last_update = message.signature_counter().clone();
                } else {
                    if previous > number {
                        issues.push(ValidationIssue::DelayedTransactionCounter {
                            message: Arc::clone(message),
                            expected: previous,
                            found: number,
                        });
                    }
                    self.transactions.insert(
                        key,
                        Transaction {
                            signature_counter_last_update: message.signature_counter().clone(),
                            is_open: true,
                        },
                    );
                }
            }
            OperationType::Update => {
                let expected = expected.clone();
                match self.transactions.get(&key) {
                    None => issues.push(ValidationIssue::UpdateForNotOpenTransaction {
                        message: Arc::clone(message),
                        transaction_number: number,
                        expected,
                    }),
                    Some(existing) if !existing.is_open => {
                        issues.push(ValidationIssue::UpdateForClosedTransaction {
                            message: Arc::clone(message),
                            transaction_number: number,
                            expected,
                        })
                    }
                    Some(_) => {}
                }
            }
            OperationType::Finish => {
                let expected = expected.clone();
                match self.transactions.get_mut(&key) {
                    None => issues.push(ValidationIssue::FinishForNotOpenTransaction {
                        message: Arc::clone(message),
                        transaction_number: number,
                        expected,
                    }),
                    Some(existing) => {
                        if !existing.is_open {
                            issues.push(ValidationIssue::FinishForClosedTransaction {
                                message: Arc::clone(message),
                                transaction_number: number,
                                expected,
                            });
                        }
                        existing.is_open = false;
                    }
                }
            }
        }
        issues
    }
}

impl Validator for TransactionCounterValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn validate(&mut self, archive: &dyn LogMessageArchive) -> ValidationResult {
        let mut result = ValidationResult::for_validator(NAME);
        let mut seen = 0usize;
        for message in archive.sorted_log_messages() {
            if message.transaction_log().is_none() {
                continue;
            }
            seen += 1;
            for issue in self.update_state(message) {
                trace!(validator = NAME, kind = %issue.kind(), "{}", issue);
                result.push(NAME, issue);
            }
        }
        debug!(
            validator = NAME,
            transaction_logs = seen,
            findings = result.len(),
            serials = self.expected.len(),
            "Transaction counter validation complete"
        );
        result
    }

    fn into_validators(self: Box<Self>) -> Vec<Box<dyn Validator>> {
        vec![self]
    }
}
