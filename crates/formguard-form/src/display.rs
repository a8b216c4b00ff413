// File: src/display.rs
// Purpose: Render validation results into a form's error slots

use crate::config::FormConfig;
use crate::element::{ErrorSlot, FormElement};
use formguard_rules::{FieldResult, FormResult};

/// Locate a field's error slot. An explicit association wins over the id
/// convention; the convention uses the field id, or the name when there is none.
pub fn resolve_error_slot<F: FormElement + ?Sized>(
    form: &F,
    config: &FormConfig,
    field: &str,
) -> Option<ErrorSlot> {
    let explicit = ErrorSlot::ForField(field.to_string());
    if form.has_error_slot(&explicit) {
        return Some(explicit);
    }

    let base = form.field_id(field).unwrap_or_else(|| field.to_string());
    let by_id = ErrorSlot::ElementId(config.error_id_for(&base));
    form.has_error_slot(&by_id).then_some(by_id)
}

/// Show the first error of a field, or clear it when the field is valid.
pub fn show_field_result<F: FormElement + ?Sized>(
    form: &F,
    config: &FormConfig,
    field: &str,
    result: &FieldResult,
) {
    let message = result.first_error();
    form.set_invalid(field, message.is_some());
    match resolve_error_slot(form, config, field) {
        Some(slot) => form.write_error(&slot, message),
        None if message.is_some() => {
            tracing::debug!(field, "no error slot for field; only marking it invalid");
        }
        None => {}
    }
}

pub fn show_form_result<F: FormElement + ?Sized>(form: &F, config: &FormConfig, result: &FormResult) {
    for (field, field_result) in result.fields() {
        show_field_result(form, config, field, field_result);
    }
}

/// Return every field and every error slot to the pristine state.
pub fn clear_all<F: FormElement + ?Sized>(form: &F) {
    for field in form.field_names() {
        form.set_invalid(&field, false);
    }
    for slot in form.error_slots() {
        form.write_error(&slot, None);
    }
}
