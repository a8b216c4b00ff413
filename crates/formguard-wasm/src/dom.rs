// File: src/dom.rs
// Purpose: FormElement over a live HTML form

use formguard_form::{ErrorSlot, FormConfig, FormElement};
use formguard_rules::{parse_rules, FieldValue, FormSnapshot, RuleDeclaration};
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlFormElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTextAreaElement, NodeList,
};

const SUBMIT_CONTROLS: &str = r#"button[type="submit"], input[type="submit"], button:not([type])"#;
/// Child of a submit button holding just the label text, next to icons or spinners.
const SUBMIT_LABEL_SLOT: &str = "[data-submit-label]";

/// Selector fragment `[attr="value"]` with the value quoted safely.
fn attr_selector(attr: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!(r#"[{}="{}"]"#, attr, escaped)
}

fn label_slot(button: &Element) -> Option<Element> {
    button.query_selector(SUBMIT_LABEL_SLOT).ok().flatten()
}

fn elements(list: NodeList) -> impl Iterator<Item = Element> {
    (0..list.length()).filter_map(move |i| list.item(i).and_then(|n| n.dyn_into().ok()))
}

/// A browser form read and written through `web-sys`.
pub struct DomForm {
    form: HtmlFormElement,
    config: FormConfig,
}

impl DomForm {
    pub fn new(form: HtmlFormElement, config: FormConfig) -> Self {
        Self { form, config }
    }

    pub fn element(&self) -> &HtmlFormElement {
        &self.form
    }

    fn select_all(&self, selector: &str) -> Vec<Element> {
        match self.form.query_selector_all(selector) {
            Ok(list) => elements(list).collect(),
            Err(_) => {
                tracing::warn!(selector, "invalid selector");
                Vec::new()
            }
        }
    }

    fn select(&self, selector: &str) -> Option<Element> {
        self.form.query_selector(selector).ok().flatten()
    }

    fn named(&self, field: &str) -> Vec<Element> {
        self.select_all(&attr_selector("name", field))
    }

    /// Every named, value-carrying control in document order.
    fn controls(&self) -> Vec<Element> {
        let list = self.form.elements();
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter(|el| el.get_attribute("name").map_or(false, |n| !n.is_empty()))
            .filter(|el| match el.dyn_ref::<HtmlInputElement>() {
                Some(input) => !matches!(
                    input.type_().as_str(),
                    "submit" | "button" | "reset" | "image" | "file"
                ),
                None => {
                    el.is_instance_of::<HtmlTextAreaElement>()
                        || el.is_instance_of::<HtmlSelectElement>()
                }
            })
            .collect()
    }

    fn slot_element(&self, slot: &ErrorSlot) -> Option<Element> {
        match slot {
            ErrorSlot::ForField(field) => {
                self.select(&attr_selector(&self.config.markup.error_attribute, field))
            }
            ErrorSlot::ElementId(id) => self
                .form
                .owner_document()
                .and_then(|doc| doc.get_element_by_id(id)),
        }
    }

    /// `data-msg-minlength` overrides `minLength`: attribute names are
    /// lowercased by the parser, so match rule names case-insensitively.
    fn message_overrides(&self, el: &Element, rules: &str) -> HashMap<String, String> {
        let prefix = &self.config.markup.message_attribute_prefix;
        let rule_names: Vec<String> = parse_rules(rules).into_iter().map(|s| s.rule).collect();

        let mut messages = HashMap::new();
        for attr in el.get_attribute_names().iter() {
            let Some(attr) = attr.as_string() else { continue };
            let Some(suffix) = attr.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let rule = rule_names
                .iter()
                .find(|name| name.eq_ignore_ascii_case(suffix))
                .cloned()
                .unwrap_or_else(|| suffix.to_string());
            if let Some(message) = el.get_attribute(&attr) {
                messages.insert(rule, message);
            }
        }
        messages
    }
}

impl FormElement for DomForm {
    fn form_id(&self) -> Option<String> {
        let id = self.form.id();
        (!id.is_empty()).then_some(id)
    }

    fn rule_declarations(&self) -> Vec<RuleDeclaration> {
        let attribute = &self.config.markup.rules_attribute;
        let mut seen = Vec::new();
        let mut declarations = Vec::new();

        for el in self.select_all(&format!("[{}]", attribute)) {
            let Some(field) = el.get_attribute("name").filter(|n| !n.is_empty()) else {
                tracing::debug!(attribute = %attribute, "rule attribute on unnamed element ignored");
                continue;
            };
            // Radio and checkbox groups declare once
            if seen.contains(&field) {
                continue;
            }
            let rules = el.get_attribute(attribute).unwrap_or_default();
            let messages = self.message_overrides(&el, &rules);
            seen.push(field.clone());
            declarations.push(RuleDeclaration {
                field,
                rules,
                messages,
            });
        }
        declarations
    }

    fn snapshot(&self) -> FormSnapshot {
        let mut snapshot = FormSnapshot::new();
        // Unchecked groups show up as empty until a checked member is seen
        let mut placeholders: Vec<String> = Vec::new();

        for el in self.controls() {
            let name = el.get_attribute("name").unwrap_or_default();

            if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
                match input.type_().as_str() {
                    "checkbox" | "radio" => {
                        if input.checked() {
                            if let Some(pos) = placeholders.iter().position(|p| *p == name) {
                                placeholders.swap_remove(pos);
                                snapshot.insert(name, input.value());
                            } else {
                                snapshot.append(name, input.value());
                            }
                        } else if !snapshot.contains(&name) {
                            placeholders.push(name.clone());
                            snapshot.insert(name, FieldValue::default());
                        }
                    }
                    _ => snapshot.insert(name, input.value()),
                }
            } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
                snapshot.insert(name, area.value());
            } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
                if select.multiple() {
                    let options = select.selected_options();
                    let values: Vec<String> = (0..options.length())
                        .filter_map(|i| options.item(i))
                        .filter_map(|o| o.dyn_into::<HtmlOptionElement>().ok())
                        .map(|o| o.value())
                        .collect();
                    snapshot.insert(name, values);
                } else {
                    snapshot.insert(name, select.value());
                }
            }
        }
        snapshot
    }

    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for el in self.controls() {
            if let Some(name) = el.get_attribute("name") {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn field_id(&self, field: &str) -> Option<String> {
        self.named(field)
            .into_iter()
            .map(|el| el.id())
            .find(|id| !id.is_empty())
    }

    fn has_error_slot(&self, slot: &ErrorSlot) -> bool {
        self.slot_element(slot).is_some()
    }

    fn write_error(&self, slot: &ErrorSlot, message: Option<&str>) {
        if let Some(el) = self.slot_element(slot) {
            el.set_text_content(message);
        }
    }

    fn error_slots(&self) -> Vec<ErrorSlot> {
        let attribute = &self.config.markup.error_attribute;
        let mut slots: Vec<ErrorSlot> = self
            .select_all(&format!("[{}]", attribute))
            .into_iter()
            .filter_map(|el| el.get_attribute(attribute))
            .map(ErrorSlot::ForField)
            .collect();

        for field in self.field_names() {
            let base = self.field_id(&field).unwrap_or_else(|| field.clone());
            let slot = ErrorSlot::ElementId(self.config.error_id_for(&base));
            if !slots.contains(&slot) && self.has_error_slot(&slot) {
                slots.push(slot);
            }
        }
        slots
    }

    fn set_invalid(&self, field: &str, invalid: bool) {
        let class = &self.config.markup.invalid_class;
        for el in self.named(field) {
            let classes = el.class_list();
            let marked = if invalid {
                classes.add_1(class).and_then(|_| el.set_attribute("aria-invalid", "true"))
            } else {
                classes.remove_1(class).and_then(|_| el.remove_attribute("aria-invalid"))
            };
            if marked.is_err() {
                tracing::warn!(field, "failed to update invalid marking");
            }
        }
    }

    fn set_submit_enabled(&self, enabled: bool) {
        for el in self.select_all(SUBMIT_CONTROLS) {
            let updated = if enabled {
                el.remove_attribute("disabled")
            } else {
                el.set_attribute("disabled", "")
            };
            if updated.is_err() {
                tracing::warn!("failed to toggle submit control");
            }
        }
    }

    /// Button contents are read as markup so restoring them keeps icons.
    fn submit_label(&self) -> Option<String> {
        let el = self.select(SUBMIT_CONTROLS)?;
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        match label_slot(&el) {
            Some(slot) => slot.text_content(),
            None => Some(el.inner_html()),
        }
    }

    /// Writes into the `[data-submit-label]` child when there is one.
    /// Otherwise the label replaces the button's contents as markup, which is
    /// what `submit_label` handed out.
    fn set_submit_label(&self, label: &str) {
        let Some(el) = self.select(SUBMIT_CONTROLS) else {
            return;
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(label);
            return;
        }
        match label_slot(&el) {
            Some(slot) => slot.set_text_content(Some(label)),
            None => el.set_inner_html(label),
        }
    }

    fn reset_values(&self) {
        self.form.reset();
    }
}
