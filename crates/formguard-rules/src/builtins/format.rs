//! Format validators (email, URL, phone, character classes)

use once_cell::sync::Lazy;
use regex::Regex;

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

// URL validation regex
static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid url regex"));

// Optional leading +, then digits and the usual separators
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-.()]+$").expect("valid phone regex"));

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate URL format (http and https only)
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Validate a phone number: 7 to 15 digits, optionally prefixed with `+`,
/// separated by spaces, dashes, dots or parentheses.
pub fn is_valid_phone(phone: &str) -> bool {
    if !PHONE_REGEX.is_match(phone) {
        return false;
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// One or more letters
pub fn is_alpha(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphabetic)
}

/// One or more letters or digits
pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphanumeric)
}
