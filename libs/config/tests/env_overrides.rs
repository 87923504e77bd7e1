//! Environment variable overrides
//!
//! Kept in its own test binary with a single test: the process environment
//! is shared by every test in a binary.

use std::env;
use std::fs;
use tempfile::tempdir;
use ttc_config::CheckerConfig;

const OVERRIDES: [(&str, &str); 3] = [
    ("TTC_VALIDATION__SIGNATURE_COUNTER", "false"),
    ("TTC_PARSER__MAX_MESSAGE_SIZE", "4096"),
    (
        "TTC_VALIDATION__IGNORED_ISSUES",
        "delayed_transaction_counter,signature_counter_gap",
    ),
];

#[test]
fn test_environment_overrides_file_and_defaults() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("ttc.toml");
    fs::write(
        &config_path,
        r#"
[parser]
max_message_size = 2048

[validation]
ignored_issues = ["duplicate_signature_counter"]
"#,
    )
    .unwrap();

    for (key, value) in OVERRIDES {
        env::set_var(key, value);
    }
    let with_file = CheckerConfig::load(Some(&config_path));
    let without_file = CheckerConfig::load(None);
    for (key, _) in OVERRIDES {
        env::remove_var(key);
    }

    for config in [with_file.unwrap(), without_file.unwrap()] {
        assert!(!config.validation.signature_counter);
        assert!(config.validation.transaction_counter);
        assert_eq!(config.parser.max_message_size, 4096);
        assert_eq!(
            config.validation.ignored_issues,
            vec![
                "delayed_transaction_counter".to_string(),
                "signature_counter_gap".to_string()
            ]
        );
    }

    let restored = CheckerConfig::load(Some(&config_path)).unwrap();
    assert!(restored.validation.signature_counter);
    assert_eq!(restored.parser.max_message_size, 2048);
    assert_eq!(
        restored.validation.ignored_issues,
        vec!["duplicate_signature_counter".to_string()]
    );
}
