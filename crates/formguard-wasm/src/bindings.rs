// File: src/bindings.rs
// Purpose: Pure validators exported to JavaScript

use formguard_rules::{
    parse_rules, validate_field as run_field, validate_form as run_form, FieldResult, FieldRules,
    FieldValue, FormResult, FormSnapshot, RuleRegistry, RuleSpec,
};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;

/// Rules for one field, as JavaScript passes them: either a rule string
/// (`"required|email"`) or an array mixing rule strings and
/// `{ rule, params, message }` objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RulesInput {
    Text(String),
    List(Vec<RuleItem>),
}

/// One entry of a rule array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleItem {
    Text(String),
    Spec(RuleSpec),
}

impl RulesInput {
    pub fn into_specs(self) -> Vec<RuleSpec> {
        match self {
            RulesInput::Text(text) => parse_rules(&text),
            RulesInput::List(items) => items
                .into_iter()
                .flat_map(|item| match item {
                    RuleItem::Text(text) => parse_rules(&text),
                    RuleItem::Spec(spec) => vec![spec],
                })
                .collect(),
        }
    }
}

/// Field name → rules, keeping the order of the JavaScript object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormRulesInput(pub Vec<(String, RulesInput)>);

impl FormRulesInput {
    pub fn into_field_rules(self) -> FieldRules {
        self.0
            .into_iter()
            .map(|(field, rules)| (field, rules.into_specs()))
            .collect()
    }
}

impl<'de> Deserialize<'de> for FormRulesInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedRules;

        impl<'de> Visitor<'de> for OrderedRules {
            type Value = FormRulesInput;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping field names to rules")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((field, rules)) = map.next_entry::<String, RulesInput>()? {
                    entries.push((field, rules));
                }
                Ok(FormRulesInput(entries))
            }
        }

        deserializer.deserialize_map(OrderedRules)
    }
}

/// Validate one value; a missing value or snapshot counts as empty.
pub fn check_field(
    value: Option<FieldValue>,
    rules: RulesInput,
    snapshot: Option<FormSnapshot>,
) -> FieldResult {
    run_field(
        &value.unwrap_or_default(),
        &rules.into_specs(),
        &snapshot.unwrap_or_default(),
    )
}

pub fn check_form(snapshot: Option<FormSnapshot>, rules: FormRulesInput) -> FormResult {
    run_form(&snapshot.unwrap_or_default(), &rules.into_field_rules())
}

/// Serialize with plain objects instead of `Map`s, so results read like JSON.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse {}: {}", what, e)))
}

/// Validate a single field value
///
/// # Example (JavaScript)
/// ```javascript
/// const result = validateField('secret1', 'required|minLength:8');
/// // { isValid: false, errors: ['Must be at least 8 characters'] }
/// const confirm = validateField('a', 'match:password', { password: 'a' });
/// ```
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(value: JsValue, rules: JsValue, snapshot: JsValue) -> Result<JsValue, JsValue> {
    let value: Option<FieldValue> = from_js(value, "value")?;
    let rules: RulesInput = from_js(rules, "rules")?;
    let snapshot: Option<FormSnapshot> = from_js(snapshot, "form data")?;

    to_js(&check_field(value, rules, snapshot))
}

/// Validate every field that has rules
///
/// # Example (JavaScript)
/// ```javascript
/// const result = validateForm(
///     { email: 'bad', password: 'longenough' },
///     { email: 'required|email', password: 'required|minLength:8' },
/// );
/// // result.errors => { email: ['Please enter a valid email address'] }
/// ```
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(snapshot: JsValue, rules: JsValue) -> Result<JsValue, JsValue> {
    let snapshot: Option<FormSnapshot> = from_js(snapshot, "form data")?;
    let rules: FormRulesInput = from_js(rules, "rules")?;

    to_js(&check_form(snapshot, rules))
}

/// Parse a rule string into `{ rule, params, message }` objects
#[wasm_bindgen(js_name = parseRules)]
pub fn parse_rules_js(text: &str) -> Result<JsValue, JsValue> {
    to_js(&parse_rules(text))
}

/// Names of the builtin rules
#[wasm_bindgen(js_name = ruleNames)]
pub fn rule_names() -> Vec<String> {
    RuleRegistry::builtin()
        .names()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formguard_rules::RuleParam;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{json, Value};

    #[test]
    fn test_rules_accept_a_rule_string() {
        let rules: RulesInput = serde_json::from_value(json!("required|min:3")).unwrap();
        assert_eq!(
            rules.into_specs(),
            vec![RuleSpec::new("required"), RuleSpec::new("min").param(3)]
        );
    }

    #[test]
    fn test_rules_accept_spec_objects() {
        let rules: RulesInput = serde_json::from_value(json!([
            { "rule": "required", "message": "Name please" },
            { "rule": "in", "params": ["a", "b"] }
        ]))
        .unwrap();

        assert_eq!(
            rules.into_specs(),
            vec![
                RuleSpec::new("required").message("Name please"),
                RuleSpec::new("in")
                    .param(RuleParam::from("a"))
                    .param(RuleParam::from("b")),
            ]
        );
    }

    #[rstest]
    #[case(json!("required|email"), vec!["required", "email"])]
    #[case(json!(["required", "email"]), vec!["required", "email"])]
    #[case(json!(["required|minLength:8", "email"]), vec!["required", "minLength", "email"])]
    #[case(json!(["required", { "rule": "in", "params": ["a"] }]), vec!["required", "in"])]
    #[case(json!([]), vec![])]
    fn test_rules_input_shapes(#[case] input: Value, #[case] expected: Vec<&str>) {
        let rules: RulesInput = serde_json::from_value(input).unwrap();
        let names: Vec<String> = rules.into_specs().into_iter().map(|s| s.rule).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_check_field_with_rule_string_array() {
        let rules: RulesInput = serde_json::from_value(json!(["required"])).unwrap();
        let result = check_field(Some(FieldValue::from("")), rules, None);
        assert_eq!(result.errors, vec!["This field is required".to_string()]);
    }

    #[test]
    fn test_form_rules_accept_rule_string_arrays() {
        let rules: FormRulesInput = serde_json::from_value(json!({
            "email": ["required", "email"],
            "name": ["required"]
        }))
        .unwrap();
        let snapshot = FormSnapshot::new().with("email", "nope").with("name", "Ada");

        let result = check_form(Some(snapshot), rules);
        assert_eq!(result.invalid_fields(), vec!["email"]);
        assert_eq!(
            result.first_error("email"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_form_rules_keep_object_order() {
        let rules: FormRulesInput = serde_json::from_value(json!({
            "zeta": "required",
            "alpha": "email"
        }))
        .unwrap();

        let names: Vec<&str> = rules.0.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_check_field_without_value_or_snapshot() {
        let result = check_field(None, RulesInput::Text("required".to_string()), None);
        assert_eq!(result.errors, vec!["This field is required".to_string()]);
    }

    #[test]
    fn test_check_field_cross_field_match() {
        let snapshot = FormSnapshot::new().with("password", "hunter22");
        let result = check_field(
            Some(FieldValue::from("hunter22")),
            RulesInput::Text("match:password".to_string()),
            Some(snapshot),
        );
        assert!(result.is_valid);
    }

    #[test]
    fn test_check_form_reports_only_invalid_fields() {
        let snapshot: FormSnapshot = serde_json::from_value(json!({
            "email": "bad",
            "topics": ["rust", "wasm"]
        }))
        .unwrap();
        let rules: FormRulesInput = serde_json::from_value(json!({
            "email": "required|email",
            "topics": "required"
        }))
        .unwrap();

        let result = check_form(Some(snapshot), rules);
        assert!(!result.is_valid);
        assert_eq!(result.invalid_fields(), vec!["email"]);
    }
}
