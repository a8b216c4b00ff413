//! String validation functions

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Mutex;

/// Compiled `pattern` sources; `None` records a source that failed to compile.
static PATTERNS: Lazy<Mutex<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Length is counted in characters, not bytes.
pub fn has_min_length(s: &str, min: usize) -> bool {
    s.chars().count() >= min
}

pub fn has_max_length(s: &str, max: usize) -> bool {
    s.chars().count() <= max
}

pub fn has_length_between(s: &str, min: usize, max: usize) -> bool {
    let len = s.chars().count();
    len >= min && len <= max
}

/// Equality validator
pub fn equals(value: &str, expected: &str) -> bool {
    value == expected
}

/// Enum/value restriction
pub fn is_one_of(value: &str, allowed: &[&str]) -> bool {
    allowed.contains(&value)
}

/// Compile a `pattern` rule source. The pattern must match the whole value,
/// the way the HTML `pattern` attribute does.
///
/// Each source is compiled once per process; an invalid source is reported
/// once and stays invalid.
pub fn compile_pattern(source: &str) -> Option<Regex> {
    let mut patterns = PATTERNS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(compiled) = patterns.get(source) {
        return compiled.clone();
    }

    let anchored = format!("^(?:{})$", source);
    let compiled = match Regex::new(&anchored) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(pattern = %source, error = %err, "invalid pattern rule; field will never validate");
            None
        }
    };
    patterns.insert(source.to_string(), compiled.clone());
    compiled
}
