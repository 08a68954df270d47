//! Integration Test: Error Propagation
//!
//! **Policy**: Production code MUST NOT call `unwrap()` or `expect()`.
//! Library errors are `thiserror` enums returned with `?`; the binary wraps
//! them with `anyhow` context.
//! **Exceptions**: `#[cfg(test)]` modules and the `tests/` directories.

use architectural_enforcement::{find_violations, report, PRODUCTION_DIRS};

fn is_panicking_call(code: &str) -> bool {
    code.contains(".unwrap()") || code.contains(".expect(")
}

#[test]
fn test_no_unwrap_or_expect_in_production_code() {
    let violations: Vec<_> = PRODUCTION_DIRS
        .iter()
        .flat_map(|dir| find_violations(dir, is_panicking_call))
        .collect();

    report("No unwrap()/expect() in production code", &violations);
}

#[test]
fn test_detects_panicking_calls() {
    assert!(is_panicking_call("let v = x.unwrap();"));
    assert!(is_panicking_call("let v = x.expect(\"boom\");"));
    assert!(!is_panicking_call("let v = x.unwrap_or_default();"));
    assert!(!is_panicking_call("let v = x.unwrap_or_else(|| 1);"));
}
