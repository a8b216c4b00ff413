// File: src/validator.rs
// Purpose: Field and form validation against a rule registry

use crate::registry::RuleRegistry;
use crate::result::{FieldResult, FormResult};
use crate::rule::{FieldRules, RuleSpec};
use crate::value::{FieldValue, FormSnapshot};
use std::sync::Arc;

/// Runs values through rules looked up in a registry.
///
/// Validation is pure: results depend only on the inputs and the registry,
/// so a validator can be shared and called repeatedly.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
}

impl Validator {
    pub fn new(registry: impl Into<Arc<RuleRegistry>>) -> Self {
        Self {
            registry: registry.into(),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run every rule in declaration order and collect every failure.
    ///
    /// Rule names missing from the registry are skipped.
    pub fn validate_field(
        &self,
        value: &FieldValue,
        rules: &[RuleSpec],
        form: &FormSnapshot,
    ) -> FieldResult {
        let mut errors = Vec::new();

        for spec in rules {
            let Some(definition) = self.registry.get(&spec.rule) else {
                tracing::trace!(rule = %spec.rule, "skipping unknown rule");
                continue;
            };

            let predicate = definition.kind.predicate(&spec.params);
            if !predicate(value, form) {
                errors.push(
                    spec.message
                        .clone()
                        .unwrap_or_else(|| definition.message.resolve(&spec.params)),
                );
            }
        }

        FieldResult::from_errors(errors)
    }

    /// Validate every field in `rules`, in its insertion order.
    ///
    /// Fields without rules are ignored even when present in the snapshot;
    /// fields missing from the snapshot validate as empty text.
    pub fn validate_form(&self, form: &FormSnapshot, rules: &FieldRules) -> FormResult {
        let empty = FieldValue::default();
        let fields = rules
            .iter()
            .map(|(field, specs)| {
                let value = form.get(field).unwrap_or(&empty);
                (field.to_string(), self.validate_field(value, specs, form))
            })
            .collect();

        let result = FormResult::from_fields(fields);
        tracing::debug!(
            fields = rules.len(),
            invalid = result.invalid_fields().len(),
            "validated form"
        );
        result
    }

    /// Rule names used in `rules` that the registry does not know, with their field.
    pub fn unknown_rules<'a>(&self, rules: &'a FieldRules) -> Vec<(&'a str, &'a str)> {
        rules
            .iter()
            .flat_map(|(field, specs)| specs.iter().map(move |spec| (field, spec.rule.as_str())))
            .filter(|(_, rule)| !self.registry.contains(rule))
            .collect()
    }
}

impl Default for Validator {
    /// Validator over the shared builtin registry.
    fn default() -> Self {
        Self::new(RuleRegistry::builtin())
    }
}

/// [`Validator::validate_field`] with the builtin rules.
pub fn validate_field(value: &FieldValue, rules: &[RuleSpec], form: &FormSnapshot) -> FieldResult {
    Validator::default().validate_field(value, rules, form)
}

/// [`Validator::validate_form`] with the builtin rules.
pub fn validate_form(form: &FormSnapshot, rules: &FieldRules) -> FormResult {
    Validator::default().validate_form(form, rules)
}
