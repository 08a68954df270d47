//! Integration Test: Headless Core
//!
//! **Policy**: `cabinet-core` never writes to stdout or stderr. Surfaces
//! render the published view; the core reports through `tracing`.

use architectural_enforcement::{find_violations, report, CORE_DIR};

fn is_direct_output(code: &str) -> bool {
    ["println!", "print!(", "eprintln!", "eprint!(", "dbg!("]
        .iter()
        .any(|m| code.contains(m))
}

#[test]
fn test_core_does_not_print() {
    let violations = find_violations(CORE_DIR, is_direct_output);
    report("cabinet-core must log via tracing, never print", &violations);
}

#[test]
fn test_core_does_not_depend_on_terminal_crates() {
    let manifest = std::fs::read_to_string(
        architectural_enforcement::workspace_root().join("cabinet/core/Cargo.toml"),
    )
    .unwrap();
    for forbidden in ["clap", "tracing-subscriber", "ratatui", "crossterm"] {
        let declared = manifest
            .lines()
            .any(|line| line.trim_start().starts_with(&format!("{forbidden} ")));
        assert!(!declared, "cabinet-core must not depend on {forbidden}");
    }
}
