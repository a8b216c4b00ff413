// File: src/element.rs
// Purpose: The seam between the controller and a concrete form (DOM or in-memory)

use formguard_rules::{FormSnapshot, RuleDeclaration};

/// Where a field's error message is displayed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSlot {
    /// Element explicitly associated with the field name (`data-error-for="email"`)
    ForField(String),
    /// Element found by id convention (`email-error`)
    ElementId(String),
}

/// A form the controller can read from and render into.
///
/// All methods take `&self`: forms are shared between the controller and the
/// events it emits, and implementations keep their own interior state (the
/// DOM, or cells for in-memory forms).
pub trait FormElement {
    /// Identifier used in logs.
    fn form_id(&self) -> Option<String>;

    /// Every field carrying a rule attribute, in document order.
    fn rule_declarations(&self) -> Vec<RuleDeclaration>;

    /// Current values of every named field. Never cached.
    fn snapshot(&self) -> FormSnapshot;

    /// Names of every field, validated or not.
    fn field_names(&self) -> Vec<String>;

    /// Element id of a field, when it has one.
    fn field_id(&self, field: &str) -> Option<String>;

    fn has_error_slot(&self, slot: &ErrorSlot) -> bool;

    /// Write a message into a slot; `None` clears it.
    fn write_error(&self, slot: &ErrorSlot, message: Option<&str>);

    /// Every error slot inside the form.
    fn error_slots(&self) -> Vec<ErrorSlot>;

    /// Toggle the invalid marking of a field.
    fn set_invalid(&self, field: &str, invalid: bool);

    fn set_submit_enabled(&self, enabled: bool);

    fn submit_label(&self) -> Option<String>;

    fn set_submit_label(&self, label: &str);

    /// Restore every field to its initial value.
    fn reset_values(&self);
}
