// File: src/parser.rs
// Purpose: Compile the `rule|rule:param,param` grammar into RuleSpecs

use crate::rule::{FieldRules, RuleParam, RuleSpec};
use std::collections::HashMap;

/// Parse one field's rule string.
///
/// Rules are separated by `|`; a parameterized rule is written
/// `name:param1,param2`. Declaration order is preserved, empty tokens are
/// skipped and unknown rule names are kept as-is. Parsing never fails.
///
/// ```
/// use formguard_rules::{parse_rules, RuleParam};
///
/// let rules = parse_rules("required|min:10|match:password");
/// assert_eq!(rules[1].rule, "min");
/// assert_eq!(rules[1].params, vec![RuleParam::number(10.0)]);
/// assert_eq!(rules[2].params, vec![RuleParam::Text("password".into())]);
/// ```
pub fn parse_rules(input: &str) -> Vec<RuleSpec> {
    input
        .split('|')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> RuleSpec {
    // Split at the first colon only, so parameters may contain colons
    match token.split_once(':') {
        Some((name, params)) => RuleSpec {
            rule: name.trim().to_string(),
            params: params
                .split(',')
                .map(|param| RuleParam::from_token(param.trim()))
                .collect(),
            message: None,
        },
        None => RuleSpec::new(token),
    }
}

/// A field's rules as declared in markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDeclaration {
    pub field: String,
    /// Raw rule string, e.g. `required|email`
    pub rules: String,
    /// Rule name to message override
    pub messages: HashMap<String, String>,
}

impl RuleDeclaration {
    pub fn new(field: impl Into<String>, rules: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rules: rules.into(),
            messages: HashMap::new(),
        }
    }

    pub fn with_message(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(rule.into(), message.into());
        self
    }
}

/// Compile every declaration of a form into its rule table.
///
/// Declarations keep their order. A field declared twice keeps its first
/// position and its last rule string.
pub fn compile_field_rules<I>(declarations: I) -> FieldRules
where
    I: IntoIterator<Item = RuleDeclaration>,
{
    let mut table = FieldRules::new();
    for declaration in declarations {
        let specs = parse_rules(&declaration.rules)
            .into_iter()
            .map(|mut spec| {
                if let Some(message) = declaration.messages.get(&spec.rule) {
                    spec.message = Some(message.clone());
                }
                spec
            })
            .collect();
        table.insert(declaration.field, specs);
    }
    table
}
