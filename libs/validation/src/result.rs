//! Validation result accumulator
//!
//! `append` is associative: validator names are unioned in first-seen order,
//! findings are concatenated in call order. Nothing is deduplicated or
//! dropped unless a caller explicitly filters.

use std::collections::BTreeMap;
use tracing::warn;
use ttc_types::{LogMessage, MessageIdentity};

use crate::issue::{IssueKind, ValidationIssue};

/// A finding tagged with the validator that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub validator: &'static str,
    pub issue: ValidationIssue,
}

/// Validators that ran and the findings they produced
///
/// The validator set holds names: two instances of the same validator type
/// appear once in [`ValidationResult::validators`], while every finding
/// either of them produced is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    validators: Vec<&'static str>,
    findings: Vec<Finding>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty result that records `validator` as having run
    pub fn for_validator(validator: &'static str) -> Self {
        Self {
            validators: vec![validator],
            findings: Vec::new(),
        }
    }

    /// Record a finding; the validator is added to the set if new
    pub fn push(&mut self, validator: &'static str, issue: ValidationIssue) {
        self.add_validator(validator);
        self.findings.push(Finding { validator, issue });
    }

    fn add_validator(&mut self, validator: &'static str) {
        if !self.validators.contains(&validator) {
            self.validators.push(validator);
        }
    }

    /// Merge `other` after `self`
    pub fn append(mut self, other: ValidationResult) -> Self {
        self.merge(other);
        self
    }

    pub fn merge(&mut self, other: ValidationResult) {
        for validator in other.validators {
            self.add_validator(validator);
        }
        self.findings.extend(other.findings);
    }

    /// Names of the validators that ran, in first-seen order
    pub fn validators(&self) -> &[&'static str] {
        &self.validators
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.findings.iter().map(|finding| &finding.issue)
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings of one kind
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues().filter(|issue| issue.kind() == kind).count()
    }

    /// Findings about one record, matched by identity
    pub fn findings_for(&self, message: &LogMessage) -> Vec<&Finding> {
        let identity = message.identity();
        self.findings
            .iter()
            .filter(|finding| {
                finding
                    .issue
                    .log_message()
                    .is_some_and(|m| m.identity() == identity)
            })
            .collect()
    }

    /// Findings keyed by record identity, for reporters
    pub fn group_by_message(&self) -> BTreeMap<MessageIdentity, Vec<&Finding>> {
        let mut groups: BTreeMap<MessageIdentity, Vec<&Finding>> = BTreeMap::new();
        for finding in &self.findings {
            if let Some(message) = finding.issue.log_message() {
                groups.entry(message.identity()).or_default().push(finding);
            }
        }
        groups
    }

    /// Drop findings of the given kinds; the validator set is kept
    pub fn without_kinds(mut self, kinds: &[IssueKind]) -> Self {
        self.findings
            .retain(|finding| !kinds.contains(&finding.issue.kind()));
        self
    }

    /// Drop findings whose kind is named in a configured ignore list
    ///
    /// Unknown names are logged and skipped.
    pub fn without_ignored(self, names: &[String]) -> Self {
        let kinds: Vec<IssueKind> = names
            .iter()
            .filter_map(|name| match name.parse() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    warn!(error = %e, "Ignoring unknown issue kind in ignore list");
                    None
                }
            })
            .collect();
        self.without_kinds(&kinds)
    }
}
