//! Log message archives.
//!
//! The archive is the unit validators consume: records in a stable total
//! order plus the certificates shipped alongside them. Reading the container
//! format is someone else's job; [`InMemoryArchive`] only orders and holds
//! what it is given.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::message::LogMessage;

/// DER bytes of a certificate, opaque to this crate
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateDer(pub Vec<u8>);

impl fmt::Debug for CertificateDer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CertificateDer({} bytes)", self.0.len())
    }
}

/// Read-only access to an archive's records and certificates
pub trait LogMessageArchive {
    /// Records in canonical order: log time, then signature counter
    fn sorted_log_messages(&self) -> &[Arc<LogMessage>];

    /// Intermediate certificates keyed by identifier
    fn intermediate_certificates(&self) -> &BTreeMap<String, CertificateDer>;

    /// Client (secure element) certificates keyed by identifier
    fn client_certificates(&self) -> &BTreeMap<String, CertificateDer>;
}

/// Canonical record order
///
/// Log time as a UTC instant first (unparseable times sort before parseable
/// ones), then signature counter, then the raw log time and file name so the
/// order is total even for malformed input.
pub fn compare_log_messages(a: &LogMessage, b: &LogMessage) -> Ordering {
    a.log_time()
        .to_utc()
        .cmp(&b.log_time().to_utc())
        .then_with(|| a.signature_counter().cmp(b.signature_counter()))
        .then_with(|| a.log_time().cmp(b.log_time()))
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Archive held entirely in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryArchive {
    messages: Vec<Arc<LogMessage>>,
    intermediate_certificates: BTreeMap<String, CertificateDer>,
    client_certificates: BTreeMap<String, CertificateDer>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records in any order; they are sorted canonically
    pub fn from_messages(messages: impl IntoIterator<Item = LogMessage>) -> Self {
        let mut archive = Self::new();
        archive.extend(messages);
        archive
    }

    /// Add records, keeping the canonical order
    pub fn extend(&mut self, messages: impl IntoIterator<Item = LogMessage>) {
        self.messages.extend(messages.into_iter().map(Arc::new));
        // Stable sort keeps insertion order between records that compare equal
        self.messages.sort_by(|a, b| compare_log_messages(a, b));
    }

    pub fn push(&mut self, message: LogMessage) {
        self.extend(std::iter::once(message));
    }

    pub fn with_intermediate_certificate(
        mut self,
        id: impl Into<String>,
        certificate: CertificateDer,
    ) -> Self {
        self.intermediate_certificates.insert(id.into(), certificate);
        self
    }

    pub fn with_client_certificate(mut self, id: impl Into<String>, certificate: CertificateDer) -> Self {
        self.client_certificates.insert(id.into(), certificate);
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl LogMessageArchive for InMemoryArchive {
    fn sorted_log_messages(&self) -> &[Arc<LogMessage>] {
        &self.messages
    }

    fn intermediate_certificates(&self) -> &BTreeMap<String, CertificateDer> {
        &self.intermediate_certificates
    }

    fn client_certificates(&self) -> &BTreeMap<String, CertificateDer> {
        &self.client_certificates
    }
}
