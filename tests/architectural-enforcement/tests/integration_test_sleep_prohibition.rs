//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. Concurrent user
//! actions are serialized by the busy token and the store waits only on I/O.
//! **Exceptions**: test code.

use architectural_enforcement::{find_violations, report, PRODUCTION_DIRS};

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(") || code.contains("sleep_until(")
}

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations: Vec<_> = PRODUCTION_DIRS
        .iter()
        .flat_map(|dir| find_violations(dir, is_sleep_call))
        .collect();

    report("No sleep in production code; wait on I/O instead", &violations);
}

#[test]
fn test_detects_sleep_patterns() {
    assert!(is_sleep_call("tokio::time::sleep(Duration::from_millis(5)).await;"));
    assert!(is_sleep_call("std::thread::sleep(d);"));
    assert!(!is_sleep_call("let asleep = true;"));
}
