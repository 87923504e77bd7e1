//! # TTC Codec - Log Message Encoding Rules
//!
//! ## Purpose
//!
//! The "rules" layer between raw archive bytes and the data model in
//! `ttc-types`:
//! - strict DER element decoding and encoding
//! - log message parsing with data-to-be-signed (DTBS) capture
//! - per-kind certified data decoding (transaction, system, audit logs)
//! - DTBS re-derivation from parsed fields
//! - a builder that produces signed records and their archive file names
//! - certificate file name consistency checks
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → libs/validation
//!     ↑           ↓             ↓
//! Data model   Bytes ⇄      Cross-record
//! LogMessage   LogMessage   findings
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Archive container reading (tar handling lives with the caller)
//! - Signature verification or certificate chain building
//! - Cross-record checks (belongs in libs/validation)

pub mod builder;
pub mod certificate;
pub mod der;
pub mod dtbs;
pub mod error;
pub mod kinds;
pub mod parser;

pub use builder::LogMessageBuilder;
pub use certificate::CertificateFileName;
pub use der::{decode_length, DerReader, ElementRef};
pub use dtbs::{dtbs_matches, encode_dtbs, encode_dtbs_fields, encode_log_message};
pub use error::{CertificateError, DerError, DerResult, ParseError, ParseResult};
pub use kinds::{decoder_for, CertifiedDataDecoder};
pub use parser::{parse_log_message, parse_log_message_as, LogMessageParser, ParserLimits};
