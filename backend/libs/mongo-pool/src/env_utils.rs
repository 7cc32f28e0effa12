//! Environment variable helpers shared by services that read their
//! settings from the process environment.

use std::str::FromStr;

/// Parse `key` into `T`, falling back to `default` when the variable is
/// missing or does not parse.
pub fn parse_env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse `key` into `T`; `None` when missing or unparseable.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read `key` as a string, treating blank values as unset.
pub fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read `key` as a string or return `default`.
pub fn env_string_or(key: &str, default: &str) -> String {
    env_nonempty(key).unwrap_or_else(|| default.to_string())
}
