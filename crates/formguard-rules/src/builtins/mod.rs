//! Builtin rules
//!
//! Every builtin is a plain function over a value (grouped by concern in the
//! submodules) plus its registry entry in [`install`].

pub mod format;
pub mod numeric;
pub mod string;

pub use format::*;
pub use numeric::*;
pub use string::*;

use crate::registry::{RuleKind, RuleMessage, RuleRegistry, ValuePredicate};
use crate::rule::RuleParam;
use crate::value::{FieldValue, FormSnapshot};
use std::sync::Arc;

fn predicate<F>(f: F) -> ValuePredicate
where
    F: Fn(&FieldValue, &FormSnapshot) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Predicate for parameters that cannot configure the rule.
fn always_fails() -> ValuePredicate {
    predicate(|_, _| false)
}

fn param_text(params: &[RuleParam], index: usize) -> String {
    params.get(index).map(ToString::to_string).unwrap_or_default()
}

/// Register every builtin rule. Names already present are left alone.
pub fn install(registry: &mut RuleRegistry) {
    let simple: [(&str, fn(&str) -> bool, &'static str); 7] = [
        ("email", is_valid_email, "Please enter a valid email address"),
        ("url", is_valid_url, "Please enter a valid URL"),
        ("phone", is_valid_phone, "Please enter a valid phone number"),
        ("number", is_number, "Please enter a valid number"),
        ("integer", is_integer, "Please enter a whole number"),
        ("alpha", is_alpha, "Only letters are allowed"),
        ("alphanumeric", is_alphanumeric, "Only letters and numbers are allowed"),
    ];

    let mut entries: Vec<(&str, RuleKind, RuleMessage)> = vec![(
        "required",
        RuleKind::simple(|value, _| !value.is_blank()),
        "This field is required".into(),
    )];

    for (name, check, message) in simple {
        entries.push((
            name,
            RuleKind::simple(move |value, _| check(&value.as_text())),
            message.into(),
        ));
    }

    entries.push((
        "min",
        RuleKind::factory(|params| match params.first().and_then(RuleParam::as_number) {
            Some(min) => predicate(move |value, _| is_at_least(&value.as_text(), min)),
            None => always_fails(),
        }),
        RuleMessage::template(|params| format!("Must be at least {}", param_text(params, 0))),
    ));

    entries.push((
        "max",
        RuleKind::factory(|params| match params.first().and_then(RuleParam::as_number) {
            Some(max) => predicate(move |value, _| is_at_most(&value.as_text(), max)),
            None => always_fails(),
        }),
        RuleMessage::template(|params| format!("Must be at most {}", param_text(params, 0))),
    ));

    entries.push((
        "minLength",
        RuleKind::factory(|params| match params.first().and_then(RuleParam::as_count) {
            Some(min) => predicate(move |value, _| has_min_length(&value.as_text(), min)),
            None => always_fails(),
        }),
        RuleMessage::template(|params| {
            format!("Must be at least {} characters", param_text(params, 0))
        }),
    ));

    entries.push((
        "maxLength",
        RuleKind::factory(|params| match params.first().and_then(RuleParam::as_count) {
            Some(max) => predicate(move |value, _| has_max_length(&value.as_text(), max)),
            None => always_fails(),
        }),
        RuleMessage::template(|params| {
            format!("Must be at most {} characters", param_text(params, 0))
        }),
    ));

    entries.push((
        "length",
        RuleKind::factory(|params| {
            let min = params.first().and_then(RuleParam::as_count);
            let max = params.get(1).and_then(RuleParam::as_count);
            match (min, max) {
                (Some(min), Some(max)) => {
                    predicate(move |value, _| has_length_between(&value.as_text(), min, max))
                }
                _ => always_fails(),
            }
        }),
        RuleMessage::template(|params| {
            format!(
                "Must be between {} and {} characters",
                param_text(params, 0),
                param_text(params, 1)
            )
        }),
    ));

    entries.push((
        "pattern",
        RuleKind::factory(|params| {
            // Commas belong to the pattern, not to the parameter list
            let source = params
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            match compile_pattern(&source) {
                Some(regex) => predicate(move |value, _| regex.is_match(&value.as_text())),
                None => always_fails(),
            }
        }),
        "Please match the requested format".into(),
    ));

    entries.push((
        "match",
        RuleKind::factory(|params| {
            let other = param_text(params, 0);
            if other.is_empty() {
                return always_fails();
            }
            predicate(move |value, form| equals(&value.as_text(), &form.text(&other)))
        }),
        RuleMessage::template(|params| format!("Must match {}", param_text(params, 0))),
    ));

    entries.push((
        "in",
        RuleKind::factory(|params| {
            let allowed: Vec<String> = params.iter().map(ToString::to_string).collect();
            predicate(move |value, _| {
                let allowed: Vec<&str> = allowed.iter().map(String::as_str).collect();
                match value {
                    FieldValue::Text(text) => is_one_of(text, &allowed),
                    FieldValue::List(items) => {
                        items.iter().all(|item| is_one_of(item, &allowed))
                    }
                }
            })
        }),
        RuleMessage::template(|params| {
            let allowed: Vec<String> = params.iter().map(ToString::to_string).collect();
            format!("Must be one of: {}", allowed.join(", "))
        }),
    ));

    for (name, kind, message) in entries {
        if registry.contains(name) {
            continue;
        }
        // Builtin names are static and valid
        let _ = registry.register(name, kind, message);
    }
}
