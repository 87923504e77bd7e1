//! Certificate file name consistency
//!
//! Archives store certificates as `<HEX>_X509.<ext>` where `<HEX>` is the
//! SHA-256 of the certificate's public key (for client certificates this is
//! also the subject). A mismatch is fatal for that certificate; it is not a
//! validation finding.

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::CertificateError;

const X509_MARKER: &str = "_X509.";
const EXTENSIONS: [&str; 4] = ["pem", "cer", "crt", "der"];

/// Parsed `<HEX>_X509.<ext>` certificate file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateFileName {
    identifier: String,
    extension: String,
}

impl CertificateFileName {
    pub fn parse(file_name: &str) -> Result<Self, CertificateError> {
        let invalid = |reason| CertificateError::InvalidFileName {
            file_name: file_name.to_string(),
            reason,
        };

        let (identifier, extension) = file_name
            .rsplit_once(X509_MARKER)
            .ok_or_else(|| invalid("missing _X509. marker"))?;
        if identifier.is_empty() {
            return Err(invalid("empty identifier"));
        }
        if !identifier.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("identifier is not hexadecimal"));
        }
        if !EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
        {
            return Err(invalid("extension must be pem, cer, crt or der"));
        }

        Ok(Self {
            identifier: identifier.to_string(),
            extension: extension.to_ascii_lowercase(),
        })
    }

    /// Hex identifier as written in the file name
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Subject identifier must equal the file name identifier (case-insensitive)
    pub fn check_subject(&self, subject: &str) -> Result<(), CertificateError> {
        if self.identifier.eq_ignore_ascii_case(subject) {
            return Ok(());
        }
        Err(CertificateError::FilenameToSubjectMismatch {
            expected: self.identifier.clone(),
            found: subject.to_string(),
        })
    }

    /// SHA-256 of the public key must equal the file name identifier
    pub fn check_public_key(&self, public_key: &[u8]) -> Result<(), CertificateError> {
        let digest = hex::encode_upper(Sha256::digest(public_key));
        debug!(identifier = %self.identifier, %digest, "Checking certificate public key hash");
        if self.identifier.eq_ignore_ascii_case(&digest) {
            return Ok(());
        }
        Err(CertificateError::FilenameToPubKeyMismatch {
            expected: self.identifier.clone(),
            found: digest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-256("abc")
    const ABC_HASH: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_parse() {
        let name = CertificateFileName::parse("0A1b_X509.PEM").unwrap();
        assert_eq!(name.identifier(), "0A1b");
        assert_eq!(name.extension(), "pem");
    }

    #[test]
    fn test_parse_rejects() {
        for bad in ["cert.pem", "_X509.pem", "XYZ_X509.pem", "AB_X509.txt"] {
            assert!(
                matches!(
                    CertificateFileName::parse(bad),
                    Err(CertificateError::InvalidFileName { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_public_key_hash_is_case_insensitive() {
        let lower = CertificateFileName::parse(&format!("{}_X509.cer", ABC_HASH)).unwrap();
        assert!(lower.check_public_key(b"abc").is_ok());

        let upper =
            CertificateFileName::parse(&format!("{}_X509.der", ABC_HASH.to_uppercase())).unwrap();
        assert!(upper.check_public_key(b"abc").is_ok());

        assert!(matches!(
            upper.check_public_key(b"abd"),
            Err(CertificateError::FilenameToPubKeyMismatch { .. })
        ));
    }

    #[test]
    fn test_subject() {
        let name = CertificateFileName::parse("ABCDEF_X509.crt").unwrap();
        assert!(name.check_subject("abcdef").is_ok());
        assert_eq!(
            name.check_subject("ABCDE0"),
            Err(CertificateError::FilenameToSubjectMismatch {
                expected: "ABCDEF".to_string(),
                found: "ABCDE0".to_string(),
            })
        );
    }
}
