//! Error types for data-model construction
//!
//! These cover values built from text (dotted OIDs, operation type names);
//! binary decoding failures belong to `ttc-codec`.

use thiserror::Error;

/// Errors raised while constructing data-model values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Object identifier needs at least two arcs
    #[error("Object identifier needs at least 2 arcs, got {count}")]
    TooFewArcs { count: usize },

    /// First arc must be 0, 1 or 2
    #[error("Invalid first OID arc {arc}: must be 0, 1 or 2")]
    InvalidFirstArc { arc: u64 },

    /// Second arc must be below 40 under roots 0 and 1
    #[error("Invalid second OID arc {arc} under root {root}: must be below 40")]
    InvalidSecondArc { root: u64, arc: u64 },

    /// Dotted notation contained something other than a decimal arc
    #[error("Invalid dotted OID '{input}'")]
    InvalidDottedOid { input: String },

    /// Operation type text not one of the three transaction operations
    #[error("Unknown operation type '{value}': expected StartTransaction, UpdateTransaction or FinishTransaction")]
    UnknownOperationType { value: String },
}
