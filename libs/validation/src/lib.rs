//! # TTC Validation - Cross-Record Checks
//!
//! ## Purpose
//!
//! Validators consume a whole [`LogMessageArchive`](ttc_types::LogMessageArchive)
//! in canonical order and report findings as data. Nothing here aborts on a
//! finding; every validator walks the full archive so one pass yields a
//! complete report.
//!
//! ## Architecture
//!
//! ```text
//! LogMessageArchive → AggregatedValidator → ValidationResult → reporter
//!                          ↓        ↓
//!          TransactionCounter   SignatureCounter
//!          (per serial state)   (per serial state)
//! ```
//!
//! ## State
//!
//! Validators keep per-serial state between `validate` calls so that sequence
//! breaks across archive boundaries are detected. Successive calls on one
//! instance must be serialized (`validate` takes `&mut self`); independent
//! instances share nothing.

pub mod aggregated;
pub mod issue;
pub mod result;
pub mod signature_counter;
pub mod transaction_counter;
pub mod validator;

pub use aggregated::AggregatedValidator;
pub use issue::{IssueKind, UnknownIssueKind, ValidationIssue};
pub use result::{Finding, ValidationResult};
pub use signature_counter::SignatureCounterValidator;
pub use transaction_counter::TransactionCounterValidator;
pub use validator::Validator;
