// Custom rules registered at runtime flow through the whole stack

use formguard::form::{FormController, MemoryField, MemoryForm, SubmitOutcome};
use formguard::rules::ValuePredicate;
use formguard::{
    FieldValue, FormConfig, FormSnapshot, RuleKind, RuleMessage, RuleParam, RuleRegistry,
    Validator,
};
use futures::executor::block_on;
use pretty_assertions::assert_eq;
use std::rc::Rc;
use std::sync::Arc;

fn registry() -> RuleRegistry {
    let mut registry = RuleRegistry::with_builtins();

    registry
        .register(
            "slug",
            RuleKind::simple(|value: &FieldValue, _: &FormSnapshot| {
                let text = value.as_text();
                !text.is_empty()
                    && text
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            }),
            "Use lowercase letters, digits and dashes",
        )
        .unwrap();

    registry
        .register(
            "multipleOf",
            RuleKind::factory(|params: &[RuleParam]| -> ValuePredicate {
                let step = params.first().and_then(RuleParam::as_number);
                Arc::new(move |value: &FieldValue, _: &FormSnapshot| {
                    match (step, value.as_text().trim().parse::<f64>()) {
                        (Some(step), Ok(n)) if step != 0.0 => n % step == 0.0,
                        _ => false,
                    }
                })
            }),
            RuleMessage::template(|params: &[RuleParam]| {
                let step = params.first().map(ToString::to_string).unwrap_or_default();
                format!("Must be a multiple of {}", step)
            }),
        )
        .unwrap();

    registry
}

fn controller(form: MemoryForm) -> FormController<MemoryForm> {
    FormController::with_validator(
        Rc::new(form),
        Validator::new(registry()),
        FormConfig::default(),
    )
    .unwrap()
}

#[test]
fn custom_rules_report_their_messages() {
    let controller = controller(
        MemoryForm::new()
            .field(MemoryField::new("handle").rules("required|slug").value("Not A Slug"))
            .field(MemoryField::new("seats").rules("multipleOf:4").value("10")),
    );

    let result = controller.validate();
    assert_eq!(
        result.first_error("handle"),
        Some("Use lowercase letters, digits and dashes")
    );
    assert_eq!(result.first_error("seats"), Some("Must be a multiple of 4"));
}

#[test]
fn custom_rules_allow_submission_when_satisfied() {
    let controller = controller(
        MemoryForm::new()
            .field(MemoryField::new("handle").rules("required|slug").value("ada-99"))
            .field(MemoryField::new("seats").rules("multipleOf:4").value("12")),
    );

    match block_on(controller.submit()) {
        SubmitOutcome::Submitted(data) => {
            assert_eq!(data.text("handle"), "ada-99");
            assert_eq!(data.text("seats"), "12");
        }
        other => panic!("expected submission, got {:?}", other),
    }
}

#[test]
fn custom_rules_are_unknown_to_the_builtin_registry() {
    let result = formguard::validate_field(
        &FieldValue::from("Not A Slug"),
        &formguard::parse_rules("slug"),
        &FormSnapshot::new(),
    );
    assert!(result.is_valid);
}
