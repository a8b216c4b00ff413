// File: src/rule.rs
// Purpose: Compiled rule usages (RuleSpec) and the per-form rule table (FieldRules)

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;

/// One declared rule parameter.
///
/// Tokens that parse as a finite number become `Number`; everything else
/// stays `Text`. A numeric token keeps its declared spelling, so `007` and
/// `1.50` display (and match) as written.
#[derive(Debug, Clone)]
pub enum RuleParam {
    Number { value: f64, raw: Option<String> },
    Text(String),
}

impl RuleParam {
    pub fn number(value: f64) -> Self {
        RuleParam::Number { value, raw: None }
    }

    /// Coerce a raw grammar token.
    pub fn from_token(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() && !token.is_empty() => RuleParam::Number {
                value,
                raw: Some(token.to_string()),
            },
            _ => RuleParam::Text(token.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleParam::Number { value, .. } => Some(*value),
            RuleParam::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
        }
    }

    /// Non-negative whole-number parameter, used for length bounds.
    pub fn as_count(&self) -> Option<usize> {
        self.as_number()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n as usize)
    }

    /// The parameter as declared: the original token for parsed numbers.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RuleParam::Number { raw: Some(raw), .. } => Cow::Borrowed(raw),
            RuleParam::Number { value, raw: None } => Cow::Owned(format_number(*value)),
            RuleParam::Text(s) => Cow::Borrowed(s),
        }
    }
}

fn format_number(n: f64) -> String {
    // Whole numbers print without the trailing `.0`
    if n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Display for RuleParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Numbers are equal when both the value and the declared text agree, so
/// `in:007` and `in:7` stay distinct.
impl PartialEq for RuleParam {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuleParam::Number { value: a, .. }, RuleParam::Number { value: b, .. }) => {
                a == b && self.as_text() == other.as_text()
            }
            (RuleParam::Text(a), RuleParam::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// Canonical numbers serialize as JSON numbers. A spelling the number alone
/// cannot reproduce (`007`, `1.50`) serializes as a string.
impl Serialize for RuleParam {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RuleParam::Number { value, raw } => match raw {
                Some(raw) if *raw != format_number(*value) => serializer.serialize_str(raw),
                _ => serializer.serialize_f64(*value),
            },
            RuleParam::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for RuleParam {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Number(value) => RuleParam::number(value),
            Repr::Text(text) => RuleParam::Text(text),
        })
    }
}

impl From<f64> for RuleParam {
    fn from(n: f64) -> Self {
        RuleParam::number(n)
    }
}

impl From<i64> for RuleParam {
    fn from(n: i64) -> Self {
        RuleParam::number(n as f64)
    }
}

impl From<i32> for RuleParam {
    fn from(n: i32) -> Self {
        RuleParam::number(n as f64)
    }
}

impl From<&str> for RuleParam {
    fn from(s: &str) -> Self {
        RuleParam::Text(s.to_string())
    }
}

impl From<String> for RuleParam {
    fn from(s: String) -> Self {
        RuleParam::Text(s)
    }
}

/// A parsed rule usage: name, parameters and an optional message override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub rule: String,
    #[serde(default)]
    pub params: Vec<RuleParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleSpec {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            params: Vec::new(),
            message: None,
        }
    }

    pub fn param(mut self, param: impl Into<RuleParam>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Message shown instead of the registry's message when this rule fails.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Renders back into the `name:param,param` grammar.
impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rule)?;
        for (i, param) in self.params.iter().enumerate() {
            f.write_str(if i == 0 { ":" } else { "," })?;
            write!(f, "{}", param)?;
        }
        Ok(())
    }
}

/// Rules for every validated field of one form, in declaration order.
///
/// Field names are unique. Inserting an existing name replaces its rules but
/// keeps the field's original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRules {
    entries: Vec<(String, Vec<RuleSpec>)>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, rules: Vec<RuleSpec>) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = rules,
            None => self.entries.push((field, rules)),
        }
    }

    pub fn with(mut self, field: impl Into<String>, rules: Vec<RuleSpec>) -> Self {
        self.insert(field, rules);
        self
    }

    pub fn get(&self, field: &str) -> Option<&[RuleSpec]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleSpec])> {
        self.entries
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<RuleSpec>)> for FieldRules {
    fn from_iter<I: IntoIterator<Item = (K, Vec<RuleSpec>)>>(iter: I) -> Self {
        let mut rules = FieldRules::new();
        for (field, specs) in iter {
            rules.insert(field, specs);
        }
        rules
    }
}

impl Serialize for FieldRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, rules) in &self.entries {
            map.serialize_entry(field, rules)?;
        }
        map.end()
    }
}
