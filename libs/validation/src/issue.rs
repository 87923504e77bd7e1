//! # Validation Findings
//!
//! Closed taxonomy of cross-record findings. Each variant carries the
//! offending record (shared with the archive) and the expected and observed
//! values needed for diagnosis. `Display` gives a plain English summary;
//! presentation beyond that belongs to reporters.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use ttc_types::LogMessage;

/// Discriminant of a [`ValidationIssue`], used for filtering and configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingTransactionCounter,
    DelayedTransactionCounter,
    DuplicateTransactionCounter,
    UpdateForNotOpenTransaction,
    UpdateForClosedTransaction,
    FinishForNotOpenTransaction,
    FinishForClosedTransaction,
    SignatureCounterGap,
    DuplicateSignatureCounter,
}

impl IssueKind {
    pub const ALL: [IssueKind; 9] = [
        IssueKind::MissingTransactionCounter,
        IssueKind::DelayedTransactionCounter,
        IssueKind::DuplicateTransactionCounter,
        IssueKind::UpdateForNotOpenTransaction,
        IssueKind::UpdateForClosedTransaction,
        IssueKind::FinishForNotOpenTransaction,
        IssueKind::FinishForClosedTransaction,
        IssueKind::SignatureCounterGap,
        IssueKind::DuplicateSignatureCounter,
    ];

    /// Configuration name (snake_case)
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::MissingTransactionCounter => "missing_transaction_counter",
            IssueKind::DelayedTransactionCounter => "delayed_transaction_counter",
            IssueKind::DuplicateTransactionCounter => "duplicate_transaction_counter",
            IssueKind::UpdateForNotOpenTransaction => "update_for_not_open_transaction",
            IssueKind::UpdateForClosedTransaction => "update_for_closed_transaction",
            IssueKind::FinishForNotOpenTransaction => "finish_for_not_open_transaction",
            IssueKind::FinishForClosedTransaction => "finish_for_closed_transaction",
            IssueKind::SignatureCounterGap => "signature_counter_gap",
            IssueKind::DuplicateSignatureCounter => "duplicate_signature_counter",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue kind name not recognised
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown issue kind '{name}'")]
pub struct UnknownIssueKind {
    pub name: String,
}

impl FromStr for IssueKind {
    type Err = UnknownIssueKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownIssueKind {
                name: s.to_string(),
            })
    }
}

/// One finding about one record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// Start with a transaction number above the expected one
    #[error("Missing transaction start: transaction number was {found}, but {expected} was expected ({})", message.file_name())]
    MissingTransactionCounter {
        message: Arc<LogMessage>,
        expected: BigUint,
        found: BigUint,
    },

    /// Start with a transaction number below the expected one, not seen before
    #[error("Delayed transaction start: transaction number was {found}, but {expected} was expected ({})", message.file_name())]
    DelayedTransactionCounter {
        message: Arc<LogMessage>,
        expected: BigUint,
        found: BigUint,
    },

    /// Second Start for a transaction number already seen on this serial
    #[error("Duplicate start for transaction {transaction_number} ({})", message.file_name())]
    DuplicateTransactionCounter {
        message: Arc<LogMessage>,
        transaction_number: BigUint,
    },

    #[error("Update for transaction {transaction_number} that was never started; next expected start is {expected} ({})", message.file_name())]
    UpdateForNotOpenTransaction {
        message: Arc<LogMessage>,
        transaction_number: BigUint,
        expected: BigUint,
    },

    #[error("Update for transaction {transaction_number} after it was finished; next expected start is {expected} ({})", message.file_name())]
    UpdateForClosedTransaction {
        message: Arc<LogMessage>,
        transaction_number: BigUint,
        expected: BigUint,
    },

    #[error("Finish for transaction {transaction_number} that was never started; next expected start is {expected} ({})", message.file_name())]
    FinishForNotOpenTransaction {
        message: Arc<LogMessage>,
        transaction_number: BigUint,
        expected: BigUint,
    },

    #[error("Finish for transaction {transaction_number} that was already finished; next expected start is {expected} ({})", message.file_name())]
    FinishForClosedTransaction {
        message: Arc<LogMessage>,
        transaction_number: BigUint,
        expected: BigUint,
    },

    /// Signature counter skipped values
    #[error("Signature counter gap: counter was {found}, but {expected} was expected ({})", message.file_name())]
    SignatureCounterGap {
        message: Arc<LogMessage>,
        expected: BigUint,
        found: BigUint,
    },

    /// Signature counter not above the last one seen for the serial
    #[error("Signature counter {counter} was already used or is out of order ({})", message.file_name())]
    DuplicateSignatureCounter {
        message: Arc<LogMessage>,
        counter: BigUint,
    },
}

impl ValidationIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            ValidationIssue::MissingTransactionCounter { .. } => IssueKind::MissingTransactionCounter,
            ValidationIssue::DelayedTransactionCounter { .. } => IssueKind::DelayedTransactionCounter,
            ValidationIssue::DuplicateTransactionCounter { .. } => {
                IssueKind::DuplicateTransactionCounter
            }
            ValidationIssue::UpdateForNotOpenTransaction { .. } => {
                IssueKind::UpdateForNotOpenTransaction
            }
            ValidationIssue::UpdateForClosedTransaction { .. } => {
                IssueKind::UpdateForClosedTransaction
            }
            ValidationIssue::FinishForNotOpenTransaction { .. } => {
                IssueKind::FinishForNotOpenTransaction
            }
            ValidationIssue::FinishForClosedTransaction { .. } => {
                IssueKind::FinishForClosedTransaction
            }
            ValidationIssue::SignatureCounterGap { .. } => IssueKind::SignatureCounterGap,
            ValidationIssue::DuplicateSignatureCounter { .. } => IssueKind::DuplicateSignatureCounter,
        }
    }

    /// Offending record
    pub fn log_message(&self) -> Option<&Arc<LogMessage>> {
        match self {
            ValidationIssue::MissingTransactionCounter { message, .. }
            | ValidationIssue::DelayedTransactionCounter { message, .. }
            | ValidationIssue::DuplicateTransactionCounter { message, .. }
            | ValidationIssue::UpdateForNotOpenTransaction { message, .. }
            | ValidationIssue::UpdateForClosedTransaction { message, .. }
            | ValidationIssue::FinishForNotOpenTransaction { message, .. }
            | ValidationIssue::FinishForClosedTransaction { message, .. }
            | ValidationIssue::SignatureCounterGap { message, .. }
            | ValidationIssue::DuplicateSignatureCounter { message, .. } => Some(message),
        }
    }
}
