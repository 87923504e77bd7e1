//! Validator trait

use ttc_types::LogMessageArchive;

use crate::result::ValidationResult;

/// A check over a whole archive
///
/// `validate` never mutates the archive; it may update the validator's own
/// state, which persists across calls.
pub trait Validator: Send {
    /// Stable name recorded in results next to each finding
    fn name(&self) -> &'static str;

    fn validate(&mut self, archive: &dyn LogMessageArchive) -> ValidationResult;

    /// Leaf validators return themselves; composites surrender their children
    fn into_validators(self: Box<Self>) -> Vec<Box<dyn Validator>>;
}
