//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code (the busy token gates actions, not timing)
//! - No unwrap()/expect() in production code (errors are propagated)
//! - The headless core never prints; it logs through `tracing`
//!
//! The helpers below scan the workspace sources line by line. Comments and
//! `#[cfg(test)] mod ...` blocks are not production code and are skipped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Source directories holding production code, relative to the workspace root
pub const PRODUCTION_DIRS: &[&str] = &["cabinet/core/src", "cabinet/cli/src"];

/// The headless library crate
pub const CORE_DIR: &str = "cabinet/core/src";

/// Workspace root, resolved from this crate's manifest directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// A production line that broke a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File, relative to the workspace root
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.text)
    }
}

/// Code part of every production line in `source`, with 1-based line numbers
///
/// Stops at the first `#[cfg(test)]` that introduces a module; test modules
/// sit at the end of the file.
pub fn production_lines(source: &str) -> Vec<(usize, &str)> {
    let lines: Vec<&str> = source.lines().collect();
    let mut code = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if line.trim() == "#[cfg(test)]" && starts_test_module(&lines, idx) {
            break;
        }
        let code_part = line.split("//").next().unwrap_or(line);
        if !code_part.trim().is_empty() {
            code.push((idx + 1, code_part));
        }
    }

    code
}

fn starts_test_module(lines: &[&str], cfg_idx: usize) -> bool {
    lines
        .iter()
        .skip(cfg_idx + 1)
        .find(|l| !l.trim().is_empty())
        .is_some_and(|l| {
            let l = l.trim_start();
            l.starts_with("mod ") || l.starts_with("pub mod ")
        })
}

/// Scan every `.rs` file under `dir` (relative to the workspace root)
pub fn find_violations(dir: &str, is_violation: impl Fn(&str) -> bool) -> Vec<Violation> {
    let root = workspace_root();
    let path = root.join(dir);
    let mut violations = Vec::new();

    for entry in walkdir::WalkDir::new(&path)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };
        let relative = entry
            .path()
            .strip_prefix(&root)
            .unwrap_or(entry.path())
            .to_path_buf();

        for (line, code) in production_lines(&content) {
            if is_violation(code) {
                violations.push(Violation {
                    path: relative.clone(),
                    line,
                    text: code.trim().to_string(),
                });
            }
        }
    }

    violations
}

/// Print violations and fail the test if there are any
pub fn report(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {rule}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }

    panic!(
        "\nFound {} violation(s) of: {rule}\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_skip_comments_and_test_module() {
        let source = "\
fn a() {} // trailing
// whole comment
#[cfg(test)]
fn only_in_tests() { x.unwrap(); }

#[cfg(test)]
mod tests {
    fn b() { y.unwrap(); }
}
";
        let lines = production_lines(source);
        assert_eq!(
            lines,
            vec![
                (1, "fn a() {} "),
                (3, "#[cfg(test)]"),
                (4, "fn only_in_tests() { x.unwrap(); }"),
            ]
        );
    }

    #[test]
    fn test_production_dirs_exist() {
        for dir in PRODUCTION_DIRS {
            assert!(workspace_root().join(dir).is_dir(), "missing {dir}");
        }
    }
}
