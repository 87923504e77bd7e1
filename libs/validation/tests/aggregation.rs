//! Composite validator and result accumulator behaviour

mod common;

use common::{archive, RecordFactory, SERIAL_A, SERIAL_B};
use ttc_config::ValidationSettings;
use ttc_validation::{
    AggregatedValidator, IssueKind, SignatureCounterValidator, TransactionCounterValidator,
    ValidationResult, Validator,
};

#[test]
fn test_nested_composites_are_flattened() {
    let inner = AggregatedValidator::new()
        .with(TransactionCounterValidator::new())
        .with(SignatureCounterValidator::new());
    let outer = AggregatedValidator::new()
        .with(SignatureCounterValidator::new())
        .with(inner);

    assert_eq!(outer.len(), 3);
    assert_eq!(
        outer.names(),
        vec![
            "SignatureCounterValidator",
            "TransactionCounterValidator",
            "SignatureCounterValidator"
        ]
    );
}

#[test]
fn test_from_settings() {
    let all = AggregatedValidator::from_settings(&ValidationSettings::default());
    assert_eq!(
        all.names(),
        vec!["TransactionCounterValidator", "SignatureCounterValidator"]
    );

    let only_tx = AggregatedValidator::from_settings(&ValidationSettings {
        signature_counter: false,
        ..ValidationSettings::default()
    });
    assert_eq!(only_tx.names(), vec!["TransactionCounterValidator"]);

    let none = AggregatedValidator::from_settings(&ValidationSettings {
        transaction_counter: false,
        signature_counter: false,
        ignored_issues: Vec::new(),
    });
    assert!(none.is_empty());
    let mut none = none;
    assert!(none.validate(&archive(Vec::new())).validators().is_empty());
}

#[test]
fn test_findings_are_tagged_by_validator() {
    let mut factory = RecordFactory::new();
    let first = factory.start(SERIAL_A, 1);
    let _skipped = factory.start(SERIAL_A, 2);
    let third = factory.start(SERIAL_A, 4);
    let archive = archive(vec![first, third]);

    let mut validator = AggregatedValidator::from_settings(&ValidationSettings::default());
    let result = validator.validate(&archive);

    assert_eq!(
        result.validators(),
        &["TransactionCounterValidator", "SignatureCounterValidator"]
    );
    let tagged: Vec<_> = result
        .findings()
        .iter()
        .map(|f| (f.validator, f.issue.kind()))
        .collect();
    assert_eq!(
        tagged,
        vec![
            ("TransactionCounterValidator", IssueKind::MissingTransactionCounter),
            ("SignatureCounterValidator", IssueKind::SignatureCounterGap),
        ]
    );
}

#[test]
fn test_repeated_validator_listed_once_findings_kept() {
    let mut factory = RecordFactory::new();
    let first = factory.audit(SERIAL_A);
    let _skipped = factory.audit(SERIAL_A);
    let third = factory.audit(SERIAL_A);
    let archive = archive(vec![first, third]);

    let mut validator = AggregatedValidator::new()
        .with(SignatureCounterValidator::new())
        .with(SignatureCounterValidator::new());
    assert_eq!(validator.len(), 2);

    let result = validator.validate(&archive);
    assert_eq!(result.validators(), &["SignatureCounterValidator"]);
    assert_eq!(result.count(IssueKind::SignatureCounterGap), 2);
}

#[test]
fn test_append_is_associative_and_additive() {
    let mut factory = RecordFactory::new();
    let a = archive(vec![factory.start(SERIAL_A, 2)]);
    let b = archive(vec![factory.update(SERIAL_B, 1)]);
    let c = archive(vec![factory.finish_tx(SERIAL_B, 7)]);

    let ra = TransactionCounterValidator::new().validate(&a);
    let rb = SignatureCounterValidator::new().validate(&b);
    let rc = TransactionCounterValidator::new().validate(&c);

    let left = ra.clone().append(rb.clone()).append(rc.clone());
    let right = ra.append(rb.append(rc));
    assert_eq!(left, right);
    assert_eq!(left.len(), 2);
    assert_eq!(
        left.validators(),
        &["TransactionCounterValidator", "SignatureCounterValidator"]
    );
}

#[test]
fn test_reporter_helpers() {
    let mut factory = RecordFactory::new();
    let start = factory.start(SERIAL_A, 3);
    let dup = factory.start(SERIAL_A, 3);
    let update = factory.update(SERIAL_B, 9);
    let archive = archive(vec![start, dup, update]);

    let result = TransactionCounterValidator::new().validate(&archive);
    assert_eq!(result.len(), 3);
    assert_eq!(result.count(IssueKind::MissingTransactionCounter), 1);

    let records = ttc_types::LogMessageArchive::sorted_log_messages(&archive);
    assert_eq!(result.findings_for(&records[0]).len(), 1);
    assert_eq!(result.findings_for(&records[1]).len(), 1);

    let grouped = result.group_by_message();
    assert_eq!(grouped.len(), 3);
    assert!(grouped.contains_key(&records[2].identity()));

    let filtered = result
        .clone()
        .without_kinds(&[IssueKind::DuplicateTransactionCounter]);
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered.validators(), result.validators());

    let ignored = result.without_ignored(&[
        "update_for_not_open_transaction".to_string(),
        "not_a_kind".to_string(),
    ]);
    assert_eq!(ignored.len(), 2);
    assert_eq!(ignored.count(IssueKind::UpdateForNotOpenTransaction), 0);
}

#[test]
fn test_issue_display_is_plain_english() {
    let mut factory = RecordFactory::new();
    let archive = archive(vec![factory.start(SERIAL_A, 2)]);
    let result = TransactionCounterValidator::new().validate(&archive);
    let text = result.findings()[0].issue.to_string();
    assert!(text.starts_with("Missing transaction start: transaction number was 2, but 1 was expected"));
    assert!(text.contains("_Log-Tra_No-2_Start"));
}

#[test]
fn test_empty_result() {
    let result = ValidationResult::new();
    assert!(result.is_empty());
    assert_eq!(result.len(), 0);
    assert!(result.group_by_message().is_empty());
}
