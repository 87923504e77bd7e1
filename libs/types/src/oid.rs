//! # Object Identifiers
//!
//! Arc-list representation of ASN.1 object identifiers plus the identifiers
//! the log format assigns to certified-data types and signature algorithms.
//! Base-128 content encoding is done by `ttc-codec`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypeError;

/// BSI SE-API transaction log certified-data type
pub const SE_API_TRANSACTION_LOG: &[u64] = &[0, 4, 0, 127, 0, 7, 3, 7, 1, 1];
/// BSI SE-API system log certified-data type
pub const SE_API_SYSTEM_LOG: &[u64] = &[0, 4, 0, 127, 0, 7, 3, 7, 1, 2];
/// BSI SE-API secure-element audit log certified-data type
pub const SE_API_AUDIT_LOG: &[u64] = &[0, 4, 0, 127, 0, 7, 3, 7, 1, 3];

/// ecdsa-plain-SHA256
pub const ECDSA_PLAIN_SHA256: &[u64] = &[0, 4, 0, 127, 0, 7, 1, 1, 4, 1, 3];
/// ecdsa-plain-SHA384
pub const ECDSA_PLAIN_SHA384: &[u64] = &[0, 4, 0, 127, 0, 7, 1, 1, 4, 1, 4];
/// ecdsa-plain-SHA512
pub const ECDSA_PLAIN_SHA512: &[u64] = &[0, 4, 0, 127, 0, 7, 1, 1, 4, 1, 5];

/// ASN.1 object identifier as a list of arcs
///
/// Always holds at least two arcs with a valid X.660 root; deserialisation
/// goes through [`ObjectIdentifier::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct ObjectIdentifier {
    arcs: Vec<u64>,
}

impl ObjectIdentifier {
    /// Build an identifier, checking the X.660 rules for the first two arcs
    pub fn new(arcs: impl Into<Vec<u64>>) -> Result<Self, TypeError> {
        let arcs = arcs.into();
        if arcs.len() < 2 {
            return Err(TypeError::TooFewArcs { count: arcs.len() });
        }
        if arcs[0] > 2 {
            return Err(TypeError::InvalidFirstArc { arc: arcs[0] });
        }
        if arcs[0] < 2 && arcs[1] >= 40 {
            return Err(TypeError::InvalidSecondArc {
                root: arcs[0],
                arc: arcs[1],
            });
        }
        Ok(Self { arcs })
    }

    /// Build from one of the well-known constants in this module
    pub fn from_static(arcs: &'static [u64]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    /// Compare against an arc list without allocating
    pub fn matches(&self, arcs: &[u64]) -> bool {
        self.arcs == arcs
    }

    /// Human-friendly name for the identifiers this crate knows about
    pub fn name(&self) -> Option<&'static str> {
        match self.arcs.as_slice() {
            a if a == SE_API_TRANSACTION_LOG => Some("id-SE-API-transaction-log"),
            a if a == SE_API_SYSTEM_LOG => Some("id-SE-API-system-log"),
            a if a == SE_API_AUDIT_LOG => Some("id-SE-API-SE-audit-log"),
            a if a == ECDSA_PLAIN_SHA256 => Some("ecdsa-plain-SHA256"),
            a if a == ECDSA_PLAIN_SHA384 => Some("ecdsa-plain-SHA384"),
            a if a == ECDSA_PLAIN_SHA512 => Some("ecdsa-plain-SHA512"),
            _ => None,
        }
    }
}

impl TryFrom<Vec<u64>> for ObjectIdentifier {
    type Error = TypeError;

    fn try_from(arcs: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(arcs)
    }
}

impl From<ObjectIdentifier> for Vec<u64> {
    fn from(oid: ObjectIdentifier) -> Self {
        oid.arcs
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ObjectIdentifier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| TypeError::InvalidDottedOid {
                input: s.to_string(),
            })?;
        Self::new(arcs)
    }
}
