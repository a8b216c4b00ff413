//! Numeric validation functions
//!
//! Values arrive as text. They are coerced with a standard numeric parse;
//! anything that does not parse fails the rule instead of erroring.

/// Parse a field value as a number. Empty and non-numeric input yield `None`.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

pub fn is_number(value: &str) -> bool {
    parse_number(value).is_some()
}

/// Numeric with no fractional part
pub fn is_integer(value: &str) -> bool {
    parse_number(value).is_some_and(|n| n.is_finite() && n.fract() == 0.0)
}

/// Validates minimum value
pub fn is_at_least(value: &str, min: f64) -> bool {
    parse_number(value).is_some_and(|n| n >= min)
}

/// Validates maximum value
pub fn is_at_most(value: &str, max: f64) -> bool {
    parse_number(value).is_some_and(|n| n <= max)
}
