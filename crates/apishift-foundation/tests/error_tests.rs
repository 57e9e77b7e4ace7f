//! Tests for error handling

use apishift_foundation::error::{MigrationError, MigrationResult};
use apishift_foundation::RuleSet;
use std::io;

#[test]
fn test_error_chain() {
    fn inner_function() -> Result<(), io::Error> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "Access denied",
        ))
    }

    fn outer_function() -> MigrationResult<()> {
        inner_function()?;
        Ok(())
    }

    let error = outer_function().unwrap_err();
    match error {
        MigrationError::Io(io_error) => {
            assert_eq!(io_error.kind(), io::ErrorKind::PermissionDenied);
        }
        _ => panic!("Expected IO error"),
    }
}

#[test]
fn test_error_helpers() {
    match MigrationError::pattern("**/[.ts", "unclosed character class") {
        MigrationError::Pattern { pattern, message } => {
            assert_eq!(pattern, "**/[.ts");
            assert_eq!(message, "unclosed character class");
        }
        _ => panic!("Expected pattern error"),
    }

    match MigrationError::config("scope_roots must not be empty") {
        MigrationError::Config { message } => {
            assert_eq!(message, "scope_roots must not be empty");
        }
        _ => panic!("Expected config error"),
    }
}

#[test]
fn test_rule_set_error_classification() {
    assert!(MigrationError::rule_set_invalid("bad").is_rule_set_error());
    assert!(MigrationError::pattern("[", "bad").is_rule_set_error());
    assert!(!MigrationError::config("bad").is_rule_set_error());
    assert!(!MigrationError::edit_conflict("overlap").is_rule_set_error());
    assert!(!MigrationError::parse("src/app/a.ts", "unexpected token").is_rule_set_error());
}

#[test]
fn test_error_display() {
    let error = MigrationError::parse("src/app/a.ts", "Unexpected token");
    assert_eq!(error.to_string(), "Parse error in src/app/a.ts: Unexpected token");

    let error = RuleSet::from_json(r#"{ "components": [{ "replacements": [] }] }"#).unwrap_err();
    assert!(error.to_string().starts_with("Invalid rule-set:"));
}
