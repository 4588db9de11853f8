//! Environment variable expansion for user supplied paths.
//!
//! Windows Terminal settings reference icon files with `%USERPROFILE%`-style
//! variables, while hand-written plugin configs tend to use `${VAR}` or `$VAR`.
//! All three forms are expanded; references to unset variables are kept
//! verbatim so the resulting path still points at something recognisable in
//! log messages.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Matches `$$`, `%VAR%`, `${VAR}` and `$VAR`.
/// Compiled once at startup using LazyLock to avoid recompiling on every call.
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$\$|%([A-Za-z_][A-Za-z0-9_()]*)%|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("env-var expansion regex is a compile-time constant and must be valid")
});

/// Expand environment variable references in `input`.
///
/// - `%VAR%`, `${VAR}` and `$VAR` are replaced with the value of `VAR`.
/// - If the variable is not set, the reference is left unchanged.
/// - `$$` is an escape and produces a literal `$`.
pub fn expand_env_vars(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand variables using a custom lookup (for testing and embedders).
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_VAR_PATTERN
        .replace_all(input, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str());
            match name {
                Some(name) => lookup(name).unwrap_or_else(|| caps[0].to_string()),
                None => "$".to_string(),
            }
        })
        .into_owned()
}
