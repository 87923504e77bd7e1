//! # TTC Types Library
//!
//! Pure data model for signed secure-element log messages and the archives
//! that carry them.
//!
//! ## Design Philosophy
//!
//! - **Closed Message Kinds**: a parsed record is a [`LogMessage`] whose
//!   [`LogMessageKind`] says which certified-data type it carries; the
//!   transaction fields only exist on the transaction variant
//! - **Immutable Records**: the DTBS bytes are fixed when the record is built
//!   and cannot be changed afterwards
//! - **Arbitrary Precision Counters**: signature and transaction counters are
//!   `BigUint`, never truncated to a machine word
//! - **Clear Boundaries**: encoding rules live in `ttc-codec`, cross-record
//!   rules in `ttc-validation`; this crate only describes data
//!
//! ## Architecture Role
//!
//! ```text
//! ttc-types → ttc-codec → ttc-validation
//!     ↑           ↓              ↓
//! LogMessage   DER parser    Validators
//! Archive      DTBS bytes    Findings
//! ```

pub mod archive;
pub mod element;
pub mod errors;
pub mod log_time;
pub mod message;
pub mod oid;

pub use archive::{compare_log_messages, CertificateDer, InMemoryArchive, LogMessageArchive};
pub use element::{Element, Tag, TagClass};
pub use errors::TypeError;
pub use log_time::LogTime;
pub use message::{
    LogMessage, LogMessageFields, LogMessageKind, MessageIdentity, MessageKind, OperationType,
    SerialNumber, SignatureAlgorithm, SystemLog, TransactionLog,
};
pub use oid::ObjectIdentifier;

// Re-export so downstream crates agree on one integer type
pub use num_bigint::BigUint;
