//! Semantic commit message classification.

use std::sync::LazyLock;

use regex::Regex;

/// Commit type reported for messages outside the grammar.
pub const UNKNOWN_TYPE: &str = "unknown";

// e.g. "feat(auth): implement 2fa and token refresh cycle"
#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SEMANTIC_COMMIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)(?:\((?P<scope>[^)]+)\))?: (?P<description>.+)$").unwrap()
});

/// A commit message split into its semantic parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    /// Type token, or `"unknown"`.
    pub commit_type: String,
    /// Scope token, empty when absent.
    pub scope: String,
    /// Description, or the whole message when the grammar does not match.
    pub description: String,
}

/// Classifies `message` against `type(scope): description`.
///
/// Only the first line is matched. Captures are returned verbatim; a message
/// that does not match yields `("unknown", "", message)` with `message`
/// unmodified.
pub fn classify(message: &str) -> ClassifiedCommit {
    let first_line = message.lines().next().unwrap_or_default();

    match SEMANTIC_COMMIT_PATTERN.captures(first_line) {
        Some(caps) => {
            let group = |name: &str| {
                caps.name(name)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            };
            ClassifiedCommit {
                commit_type: group("type"),
                scope: group("scope"),
                description: group("description"),
            }
        }
        None => ClassifiedCommit {
            commit_type: UNKNOWN_TYPE.to_string(),
            scope: String::new(),
            description: message.to_string(),
        },
    }
}
