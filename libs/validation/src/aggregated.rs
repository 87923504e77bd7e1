//! Composite validator
//!
//! Holds leaf validators in insertion order. Adding a composite inlines its
//! children, so nesting never changes evaluation order.

use std::fmt;
use tracing::{debug, info};
use ttc_config::ValidationSettings;
use ttc_types::LogMessageArchive;

use crate::result::ValidationResult;
use crate::signature_counter::SignatureCounterValidator;
use crate::transaction_counter::TransactionCounterValidator;
use crate::validator::Validator;

const NAME: &str = "AggregatedValidator";

#[derive(Default)]
pub struct AggregatedValidator {
    validators: Vec<Box<dyn Validator>>,
}

impl AggregatedValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validators enabled in the settings, in a fixed order
    pub fn from_settings(settings: &ValidationSettings) -> Self {
        let mut aggregated = Self::new();
        if settings.transaction_counter {
            aggregated.add(Box::new(TransactionCounterValidator::new()));
        }
        if settings.signature_counter {
            aggregated.add(Box::new(SignatureCounterValidator::new()));
        }
        info!(validators = ?aggregated.names(), "Validators configured");
        aggregated
    }

    /// Add a validator, flattening composites
    pub fn add(&mut self, validator: Box<dyn Validator>) {
        self.validators.extend(validator.into_validators());
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.add(Box::new(validator));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for AggregatedValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatedValidator")
            .field("validators", &self.names())
            .finish()
    }
}

impl Validator for AggregatedValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn validate(&mut self, archive: &dyn LogMessageArchive) -> ValidationResult {
        let result = self
            .validators
            .iter_mut()
            .fold(ValidationResult::new(), |acc, validator| {
                acc.append(validator.validate(archive))
            });
        debug!(
            validators = self.validators.len(),
            findings = result.len(),
            "Aggregated validation complete"
        );
        result
    }

    fn into_validators(self: Box<Self>) -> Vec<Box<dyn Validator>> {
        self.validators
    }
}
