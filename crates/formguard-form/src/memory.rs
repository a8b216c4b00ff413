// File: src/memory.rs
// Purpose: In-memory form for headless use (server-side rendering checks, tests)

use crate::element::{ErrorSlot, FormElement};
use formguard_rules::{FieldValue, FormSnapshot, RuleDeclaration};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// One field of a [`MemoryForm`].
#[derive(Debug, Clone, Default)]
pub struct MemoryField {
    pub name: String,
    pub id: Option<String>,
    pub rules: Option<String>,
    pub messages: HashMap<String, String>,
    pub value: FieldValue,
    initial: FieldValue,
    pub invalid: bool,
}

impl MemoryField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    pub fn message(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(rule.into(), message.into());
        self
    }

    /// Initial value, restored by `reset_values`.
    pub fn value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = value.into();
        self.initial = self.value.clone();
        self
    }
}

#[derive(Debug, Clone)]
struct SubmitControl {
    enabled: bool,
    label: Option<String>,
}

/// A form held entirely in memory.
#[derive(Debug)]
pub struct MemoryForm {
    id: Option<String>,
    fields: RefCell<Vec<MemoryField>>,
    slots: RefCell<BTreeMap<ErrorSlot, Option<String>>>,
    submit: RefCell<SubmitControl>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self {
            id: None,
            fields: RefCell::new(Vec::new()),
            slots: RefCell::new(BTreeMap::new()),
            submit: RefCell::new(SubmitControl {
                enabled: true,
                label: None,
            }),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn field(self, field: MemoryField) -> Self {
        self.fields.borrow_mut().push(field);
        self
    }

    pub fn error_slot(self, slot: ErrorSlot) -> Self {
        self.slots.borrow_mut().insert(slot, None);
        self
    }

    pub fn submit_button(self, label: impl Into<String>) -> Self {
        self.submit.borrow_mut().label = Some(label.into());
        self
    }

    /// Simulate the user editing a field.
    pub fn set_value(&self, field: &str, value: impl Into<FieldValue>) {
        if let Some(f) = self.fields.borrow_mut().iter_mut().find(|f| f.name == field) {
            f.value = value.into();
        }
    }

    pub fn value(&self, field: &str) -> Option<FieldValue> {
        self.fields
            .borrow()
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.value.clone())
    }

    pub fn is_invalid(&self, field: &str) -> bool {
        self.fields
            .borrow()
            .iter()
            .any(|f| f.name == field && f.invalid)
    }

    /// Text currently shown in a slot.
    pub fn error_text(&self, slot: &ErrorSlot) -> Option<String> {
        self.slots.borrow().get(slot).cloned().flatten()
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit.borrow().enabled
    }

    pub fn current_submit_label(&self) -> Option<String> {
        self.submit.borrow().label.clone()
    }
}

impl Default for MemoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FormElement for MemoryForm {
    fn form_id(&self) -> Option<String> {
        self.id.clone()
    }

    fn rule_declarations(&self) -> Vec<RuleDeclaration> {
        self.fields
            .borrow()
            .iter()
            .filter_map(|f| {
                f.rules.as_ref().map(|rules| RuleDeclaration {
                    field: f.name.clone(),
                    rules: rules.clone(),
                    messages: f.messages.clone(),
                })
            })
            .collect()
    }

    fn snapshot(&self) -> FormSnapshot {
        self.fields
            .borrow()
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.borrow().iter().map(|f| f.name.clone()).collect()
    }

    fn field_id(&self, field: &str) -> Option<String> {
        self.fields
            .borrow()
            .iter()
            .find(|f| f.name == field)
            .and_then(|f| f.id.clone())
    }

    fn has_error_slot(&self, slot: &ErrorSlot) -> bool {
        self.slots.borrow().contains_key(slot)
    }

    fn write_error(&self, slot: &ErrorSlot, message: Option<&str>) {
        if let Some(text) = self.slots.borrow_mut().get_mut(slot) {
            *text = message.map(str::to_string);
        }
    }

    fn error_slots(&self) -> Vec<ErrorSlot> {
        self.slots.borrow().keys().cloned().collect()
    }

    fn set_invalid(&self, field: &str, invalid: bool) {
        if let Some(f) = self.fields.borrow_mut().iter_mut().find(|f| f.name == field) {
            f.invalid = invalid;
        }
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.submit.borrow_mut().enabled = enabled;
    }

    fn submit_label(&self) -> Option<String> {
        self.submit.borrow().label.clone()
    }

    fn set_submit_label(&self, label: &str) {
        self.submit.borrow_mut().label = Some(label.to_string());
    }

    fn reset_values(&self) {
        for f in self.fields.borrow_mut().iter_mut() {
            f.value = f.initial.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_edits() {
        let form = MemoryForm::new().field(MemoryField::new("name").value("Ada"));
        assert_eq!(form.snapshot().text("name"), "Ada");

        form.set_value("name", "Grace");
        assert_eq!(form.snapshot().text("name"), "Grace");

        form.reset_values();
        assert_eq!(form.value("name"), Some(FieldValue::from("Ada")));
    }

    #[test]
    fn test_only_fields_with_rules_are_declared() {
        let form = MemoryForm::new()
            .field(MemoryField::new("email").rules("required|email"))
            .field(MemoryField::new("notes"));

        let declarations = form.rule_declarations();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].field, "email");
    }

    #[test]
    fn test_writes_to_missing_slot_are_dropped() {
        let form = MemoryForm::new();
        let slot = ErrorSlot::ElementId("nope".to_string());
        form.write_error(&slot, Some("boom"));
        assert!(!form.has_error_slot(&slot));
        assert_eq!(form.error_text(&slot), None);
    }
}
